// Headless terminal over the virtual filesystem. A `Terminal` owns its own
// session, turns a command line into a `Command`, runs it and hands back the
// lines to print.

use tracing::instrument;

use crate::errors::{FsError, FsErrorType, Result};
use crate::fsystem::{CatMode, Session, VirtualFileSystem};

/// Padding added after the widest name in `ls` output.
const LS_GUTTER: usize = 5;

/// A line holding only this ends a multi-line `cat >`/`cat >>`/`edit` draft.
pub const DRAFT_END: &str = ".";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Ls(Option<String>),
    Cd(String),
    Pwd,
    Cat(CatMode, String, Option<String>),
    Whereis(String),
    Mkdir(String),
    Rmdir(String),
    Rm(String),
    Rn(String, String),
    Cp(String, String),
    Mv(String, String),
    Dump(Option<String>),
    Clear,
    Exit,
}

impl Command {
    /// Parses one command line. Blank input yields `None`.
    pub fn parse(input: &str) -> Result<Option<Command>> {
        let Some((name, params)) = tokenize(input) else {
            return Ok(None);
        };
        let arg = |idx: usize, what: &str| -> Result<String> {
            params
                .get(idx)
                .cloned()
                .ok_or_else(|| FsError::missing_argument(what))
        };

        let cmd = match name.as_str() {
            "ls" => Command::Ls(params.first().cloned()),
            "cd" => Command::Cd(arg(0, "path")?),
            "pwd" => Command::Pwd,
            "cat" => match params.first().map(String::as_str) {
                Some(mode @ (">" | ">>")) => {
                    let mode = mode.parse::<CatMode>()?;
                    let contents = if params.len() > 2 {
                        Some(params[2..].join(" "))
                    } else {
                        None
                    };
                    Command::Cat(mode, arg(1, "path")?, contents)
                }
                _ => Command::Cat(CatMode::Read, arg(0, "path")?, None),
            },
            "show" => Command::Cat(CatMode::Read, arg(0, "path")?, None),
            "edit" => Command::Cat(CatMode::Append, arg(0, "path")?, None),
            "whereis" => Command::Whereis(arg(0, "query")?),
            "mkdir" => Command::Mkdir(arg(0, "path")?),
            "rmdir" => Command::Rmdir(arg(0, "path")?),
            "rm" => Command::Rm(arg(0, "path")?),
            "rn" => Command::Rn(arg(0, "path")?, arg(1, "name")?),
            "cp" => Command::Cp(arg(0, "target")?, arg(1, "destination")?),
            "mv" => Command::Mv(arg(0, "target")?, arg(1, "destination")?),
            "dump" => Command::Dump(params.first().cloned()),
            "clear" => Command::Clear,
            "exit" => Command::Exit,
            other => {
                tracing::info!("Unknown command {}", other);
                return Err(FsError::new(
                    FsErrorType::CommandNotFound,
                    format!("Command not found: {}", other),
                ));
            }
        };
        Ok(Some(cmd))
    }
}

/// Splits a command line into the command name and its parameters.
/// Parameters are separated by spaces outside of quotes; one surrounding
/// quote is stripped from each side of a parameter.
pub fn tokenize(input: &str) -> Option<(String, Vec<String>)> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    let (name, rest) = match input.find(' ') {
        Some(idx) => (&input[..idx], &input[idx + 1..]),
        None => (input, ""),
    };

    let mut params = Vec::new();
    let mut buffer = String::new();
    let mut inside = false;
    for c in rest.chars() {
        if c == ' ' && !inside {
            if !buffer.is_empty() {
                params.push(strip_quotes(&buffer));
            }
            buffer.clear();
            continue;
        }
        if c == '"' || c == '\'' {
            inside = !inside;
        }
        buffer.push(c);
    }
    if !buffer.is_empty() {
        params.push(strip_quotes(&buffer));
    }
    Some((name.to_string(), params))
}

fn strip_quotes(raw: &str) -> String {
    let s = raw.strip_prefix(['"', '\'']).unwrap_or(raw);
    let s = s.strip_suffix(['"', '\'']).unwrap_or(s);
    s.to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Control {
    #[default]
    None,
    Clear,
    Exit,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Output {
    pub lines: Vec<String>,
    pub control: Control,
}

impl Output {
    fn lines(lines: Vec<String>) -> Output {
        Output {
            lines,
            control: Control::None,
        }
    }

    fn control(control: Control) -> Output {
        Output {
            lines: Vec::new(),
            control,
        }
    }
}

// Lines collected for a write that was started without contents.
#[derive(Debug, Clone)]
struct Draft {
    mode: CatMode,
    path: String,
    separator: bool,
    lines: Vec<String>,
}

impl Draft {
    fn text(&self) -> String {
        let body = self.lines.join("\n");
        if self.separator {
            format!("\n{}", body)
        } else {
            body
        }
    }
}

pub struct Terminal {
    session: Session,
    columns: usize,
    draft: Option<Draft>,
}

impl Terminal {
    /// A terminal starting at the root, laying `ls` output out over
    /// `columns` characters.
    pub fn new(fs: &VirtualFileSystem, columns: usize) -> Terminal {
        Terminal {
            session: fs.session(),
            columns,
            draft: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn prompt(&self, fs: &VirtualFileSystem) -> String {
        fs.display_path(self.session.pointer())
            .unwrap_or_else(|_| "?".to_string())
    }

    /// True while lines are being collected for a draft rather than run as
    /// commands.
    pub fn is_composing(&self) -> bool {
        self.draft.is_some()
    }

    #[instrument(skip(self, fs), fields(session = %self.session.id()))]
    pub fn execute(&mut self, fs: &mut VirtualFileSystem, input: &str) -> Result<Output> {
        if let Some(draft) = self.draft.take() {
            return self.compose(fs, draft, input);
        }
        let Some(command) = Command::parse(input)? else {
            return Ok(Output::default());
        };
        tracing::info!(?command, "Running command");
        self.run(fs, command)
    }

    pub fn run(&mut self, fs: &mut VirtualFileSystem, command: Command) -> Result<Output> {
        let session = &mut self.session;
        let output = match command {
            Command::Ls(path) => {
                let entries = fs.ls(session, path.as_deref())?;
                let names = fs
                    .sorted(&entries)
                    .into_iter()
                    .map(|id| fs.key(id).map(str::to_string))
                    .collect::<Result<Vec<String>>>()?;
                Output::lines(columnize(&names, self.columns))
            }
            Command::Cd(path) => {
                fs.cd(session, &path)?;
                Output::default()
            }
            Command::Pwd => Output::lines(vec![fs.display_path(session.pointer())?]),
            Command::Cat(mode @ (CatMode::Overwrite | CatMode::Append), path, None) => {
                // Starting a draft: show what an append continues from and
                // check the target before any line is typed.
                let current = match fs.cat(session, CatMode::Read, &path, None) {
                    Ok(text) => text.unwrap_or_default(),
                    Err(e) if e.kind() == FsErrorType::FileNotFound => String::new(),
                    Err(e) => return Err(e),
                };
                let shown = match mode {
                    CatMode::Append => current.lines().map(str::to_string).collect(),
                    _ => Vec::new(),
                };
                tracing::debug!("Composing {:?} draft for {}", mode, path);
                self.draft = Some(Draft {
                    mode,
                    path,
                    separator: mode == CatMode::Append && !current.is_empty(),
                    lines: Vec::new(),
                });
                Output::lines(shown)
            }
            Command::Cat(mode, path, contents) => {
                let text = fs.cat(session, mode, &path, contents.as_deref())?;
                let lines = text
                    .map(|t| t.lines().map(str::to_string).collect())
                    .unwrap_or_default();
                Output::lines(lines)
            }
            Command::Whereis(query) => {
                let found = fs.whereis(&query);
                if found.is_empty() {
                    Output::lines(vec![format!("No results found: {}", query)])
                } else {
                    let paths = found
                        .into_iter()
                        .map(|id| fs.display_path(id))
                        .collect::<Result<Vec<String>>>()?;
                    Output::lines(paths)
                }
            }
            Command::Mkdir(path) => {
                fs.mkdir(session, &path)?;
                Output::default()
            }
            Command::Rmdir(path) => {
                fs.rmdir(session, &path)?;
                Output::default()
            }
            Command::Rm(path) => {
                fs.rm(session, &path)?;
                Output::default()
            }
            Command::Rn(path, name) => {
                fs.rn(session, &path, &name)?;
                Output::default()
            }
            Command::Cp(target, destination) => {
                fs.cp(session, target.as_str().into(), destination.as_str().into())?;
                Output::default()
            }
            Command::Mv(target, destination) => {
                fs.mv(session, target.as_str().into(), destination.as_str().into())?;
                Output::default()
            }
            Command::Dump(path) => {
                let node = match path {
                    Some(path) => fs.resolve(session, &path)?,
                    None => session.pointer(),
                };
                let json = serde_json::to_string_pretty(&fs.snapshot(node)?)?;
                Output::lines(json.lines().map(str::to_string).collect())
            }
            Command::Clear => Output::control(Control::Clear),
            Command::Exit => Output::control(Control::Exit),
        };
        Ok(output)
    }
}

impl Terminal {
    // Buffers one draft line, or writes the whole draft on `DRAFT_END`.
    fn compose(
        &mut self,
        fs: &mut VirtualFileSystem,
        mut draft: Draft,
        input: &str,
    ) -> Result<Output> {
        if input.trim_end() != DRAFT_END {
            draft.lines.push(input.to_string());
            self.draft = Some(draft);
            return Ok(Output::default());
        }
        fs.cat(&self.session, draft.mode, &draft.path, Some(&draft.text()))?;
        Ok(Output::default())
    }
}

// Lays names out in as many fixed-width columns as fit in `columns`
// characters.
fn columnize(names: &[String], columns: usize) -> Vec<String> {
    let width = names.iter().map(|n| n.chars().count()).max().unwrap_or(0) + LS_GUTTER;
    let per_line = (columns / width).max(1);
    names
        .chunks(per_line)
        .map(|row| {
            row.iter()
                .map(|name| format!("{:<width$}", name, width = width))
                .collect::<String>()
                .trim_end()
                .to_string()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terminal() -> (VirtualFileSystem, Terminal) {
        let fs = VirtualFileSystem::new();
        let term = Terminal::new(&fs, 40);
        (fs, term)
    }

    fn run(fs: &mut VirtualFileSystem, term: &mut Terminal, line: &str) -> Vec<String> {
        term.execute(fs, line).unwrap().lines
    }

    #[test]
    fn tokenize_respects_quotes() {
        let (name, params) = tokenize(r#"cat > "my file.txt" 'hello there'"#).unwrap();
        assert_eq!(name, "cat");
        assert_eq!(params, vec![">", "my file.txt", "hello there"]);
        let (name, params) = tokenize("  ls   a  ").unwrap();
        assert_eq!(name, "ls");
        assert_eq!(params, vec!["a"]);
        assert!(tokenize("   ").is_none());
        let (_, params) = tokenize(r#"cat > f """#).unwrap();
        assert_eq!(params, vec![">", "f", ""]);
    }

    #[test]
    fn parse_reports_missing_arguments() {
        let err = Command::parse("rn a").unwrap_err();
        assert_eq!(err.kind(), FsErrorType::MissingArgument);
        assert_eq!(err.message, "Missing argument: name");
        let err = Command::parse("cat >").unwrap_err();
        assert_eq!(err.message, "Missing argument: path");
        let err = Command::parse("whereis").unwrap_err();
        assert_eq!(err.message, "Missing argument: query");
    }

    #[test]
    fn parse_unknown_command() {
        let err = Command::parse("format c:").unwrap_err();
        assert_eq!(err.kind(), FsErrorType::CommandNotFound);
        assert_eq!(err.message, "Command not found: format");
    }

    #[test]
    fn parse_cat_variants() {
        assert_eq!(
            Command::parse("cat f").unwrap(),
            Some(Command::Cat(CatMode::Read, "f".into(), None))
        );
        assert_eq!(
            Command::parse("cat >> f more words").unwrap(),
            Some(Command::Cat(CatMode::Append, "f".into(), Some("more words".into())))
        );
        assert_eq!(
            Command::parse("show f").unwrap(),
            Some(Command::Cat(CatMode::Read, "f".into(), None))
        );
        assert_eq!(
            Command::parse("edit f").unwrap(),
            Some(Command::Cat(CatMode::Append, "f".into(), None))
        );
        assert_eq!(
            Command::parse("cat > f").unwrap(),
            Some(Command::Cat(CatMode::Overwrite, "f".into(), None))
        );
    }

    #[test]
    fn write_then_read_through_terminal() {
        let (mut fs, mut term) = terminal();
        run(&mut fs, &mut term, "cat > f.txt 'line one'");
        run(&mut fs, &mut term, "cat >> f.txt \"\nline two\"");
        assert_eq!(run(&mut fs, &mut term, "cat f.txt"), vec!["line one", "line two"]);
    }

    #[test]
    fn cat_without_contents_collects_lines_until_end_marker() {
        let (mut fs, mut term) = terminal();
        run(&mut fs, &mut term, "cat > f.txt stale");
        assert!(run(&mut fs, &mut term, "cat > f.txt").is_empty());
        assert!(term.is_composing());
        run(&mut fs, &mut term, "first line");
        run(&mut fs, &mut term, "ls is not a command here");
        // nothing is written before the draft ends
        let current = fs.cat(term.session(), CatMode::Read, "f.txt", None).unwrap();
        assert_eq!(current.as_deref(), Some("stale"));
        run(&mut fs, &mut term, DRAFT_END);
        assert!(!term.is_composing());
        assert_eq!(run(&mut fs, &mut term, "cat f.txt"), vec![
            "first line",
            "ls is not a command here"
        ]);
    }

    #[test]
    fn edit_shows_contents_and_appends_draft() {
        let (mut fs, mut term) = terminal();
        run(&mut fs, &mut term, "cat > notes.txt 'day one'");
        assert_eq!(run(&mut fs, &mut term, "edit notes.txt"), vec!["day one"]);
        run(&mut fs, &mut term, "day two");
        run(&mut fs, &mut term, DRAFT_END);
        assert_eq!(run(&mut fs, &mut term, "cat notes.txt"), vec!["day one", "day two"]);

        // a new file starts empty, with no leading blank line
        assert!(run(&mut fs, &mut term, "edit new.txt").is_empty());
        run(&mut fs, &mut term, "fresh");
        run(&mut fs, &mut term, DRAFT_END);
        assert_eq!(run(&mut fs, &mut term, "cat new.txt"), vec!["fresh"]);
    }

    #[test]
    fn draft_on_a_directory_is_refused_up_front() {
        let (mut fs, mut term) = terminal();
        run(&mut fs, &mut term, "mkdir d");
        let err = term.execute(&mut fs, "edit d").unwrap_err();
        assert_eq!(err.kind(), FsErrorType::NotAFile);
        assert!(!term.is_composing());
        let err = term.execute(&mut fs, "cat >> missing/f").unwrap_err();
        assert_eq!(err.kind(), FsErrorType::PathNotFound);
        assert!(!term.is_composing());
    }

    #[test]
    fn ls_sorts_and_wraps() {
        let (mut fs, mut term) = terminal();
        for line in ["cat > b.txt x", "mkdir zeta", "mkdir alpha", "cat > a.txt x"] {
            run(&mut fs, &mut term, line);
        }
        // widest name is 5 chars, so each column is 10 wide and 4 fit in 40
        assert_eq!(run(&mut fs, &mut term, "ls"), vec![
            "alpha     zeta      a.txt     b.txt"
        ]);
        let mut narrow = Terminal::new(&fs, 20);
        assert_eq!(run(&mut fs, &mut narrow, "ls /"), vec![
            "alpha     zeta",
            "a.txt     b.txt"
        ]);
        assert!(run(&mut fs, &mut term, "ls alpha").is_empty());
    }

    #[test]
    fn cd_changes_prompt_only_for_this_terminal() {
        let (mut fs, mut term) = terminal();
        let other = Terminal::new(&fs, 40);
        run(&mut fs, &mut term, "mkdir docs");
        run(&mut fs, &mut term, "cd docs");
        assert_eq!(term.prompt(&fs), "/docs");
        assert_eq!(other.prompt(&fs), "/");
        assert_eq!(run(&mut fs, &mut term, "pwd"), vec!["/docs"]);
        run(&mut fs, &mut term, "cd ..");
        assert_eq!(term.prompt(&fs), "/");
    }

    #[test]
    fn whereis_lists_paths_or_says_nothing() {
        let (mut fs, mut term) = terminal();
        run(&mut fs, &mut term, "mkdir a");
        run(&mut fs, &mut term, "cat > a/n.txt x");
        assert_eq!(run(&mut fs, &mut term, "whereis *.txt"), vec!["/a/n.txt"]);
        assert_eq!(run(&mut fs, &mut term, "whereis *.md"), vec![
            "No results found: *.md"
        ]);
    }

    #[test]
    fn file_commands_round_trip() {
        let (mut fs, mut term) = terminal();
        for line in [
            "mkdir src",
            "mkdir dst",
            "cat > src/a.txt hi",
            "cp src dst",
            "rn src/a.txt b.txt",
            "mkdir archive",
            "mv src archive",
        ] {
            run(&mut fs, &mut term, line);
        }
        assert_eq!(run(&mut fs, &mut term, "ls dst"), vec!["src"]);
        assert_eq!(run(&mut fs, &mut term, "cat dst/src/a.txt"), vec!["hi"]);
        assert_eq!(run(&mut fs, &mut term, "ls archive/src"), vec!["b.txt"]);
        let err = term.execute(&mut fs, "ls src").unwrap_err();
        assert_eq!(err.kind(), FsErrorType::PathNotFound);
    }

    #[test]
    fn dump_prints_json() {
        let (mut fs, mut term) = terminal();
        run(&mut fs, &mut term, "mkdir d");
        run(&mut fs, &mut term, "cat > d/f hi");
        let json = run(&mut fs, &mut term, "dump d").join("\n");
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["name"], "d");
        assert_eq!(value["children"][0]["contents"], "hi");
    }

    #[test]
    fn clear_and_exit_signal_the_caller() {
        let (mut fs, mut term) = terminal();
        assert_eq!(term.execute(&mut fs, "clear").unwrap().control, Control::Clear);
        assert_eq!(term.execute(&mut fs, "exit").unwrap().control, Control::Exit);
        assert_eq!(term.execute(&mut fs, "").unwrap(), Output::default());
    }
}
