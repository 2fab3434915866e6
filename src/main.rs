use std::io::{BufRead, Write};

use clap::Parser;
use deskfs::config::{Config, Opts};
use deskfs::shell::{Control, Terminal};
use deskfs::{seed, FsError, VirtualFileSystem};

// Allow the binary to return its version with a --version flag
const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() {
    let opts: Opts = Opts::parse();
    if opts.version {
        println!("{}", VERSION);
        return;
    }
    let config = Config::from(opts);
    if let Err(e) = run(config) {
        eprintln!("{}", e.message);
        std::process::exit(1);
    }
}

fn run(config: Config) -> Result<(), FsError> {
    let _guard = deskfs::log::init_logging(&config)?;

    let mut fs = VirtualFileSystem::new();
    if config.seed {
        seed::populate(&mut fs)?;
    }
    let mut terminal = Terminal::new(&fs, config.columns);

    if !config.commands.is_empty() {
        for command in &config.commands {
            if execute(&mut fs, &mut terminal, command) == Control::Exit {
                break;
            }
        }
        return Ok(());
    }

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    let mut lines = stdin.lock().lines();
    loop {
        // drafts are typed without a prompt, like a heredoc
        if !terminal.is_composing() {
            write!(stdout, "{} $ ", terminal.prompt(&fs))?;
        }
        stdout.flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        if execute(&mut fs, &mut terminal, &line?) == Control::Exit {
            break;
        }
    }
    Ok(())
}

fn execute(fs: &mut VirtualFileSystem, terminal: &mut Terminal, line: &str) -> Control {
    match terminal.execute(fs, line) {
        Ok(output) => {
            if output.control == Control::Clear {
                // ANSI clear screen and home the cursor
                print!("\x1b[2J\x1b[H");
            }
            for line in output.lines {
                println!("{}", line);
            }
            output.control
        }
        Err(e) => {
            eprintln!("{}", e.message);
            Control::None
        }
    }
}
