// Sample tree the binary starts with. Everything goes through the public
// mkdir/cat operations so the seed obeys the same rules as user commands.

use crate::errors::Result;
use crate::fsystem::{CatMode, VirtualFileSystem};

// Deepest directory of the sample tree, eleven levels below the root.
const ETERNAL: &str = "weeks/2023/36th/aw23/september/fourth/11thhour/59thminute/59thsecond/secondlastmilisecond/this_moment_is_eternal";

const DIRECTORIES: &[&str] = &[
    "years",
    "months",
    "seasons",
    "weeks",
    "years/2023",
    "years/atelier",
    "years/A",
    "years/seasons",
    "years/2023/cmsc142",
    "years/2023/cmsc141",
    "years/2023/sts40",
    "years/2023/cmsc198.1",
    "years/seasons/txt",
    "years/seasons/images",
    "years/seasons/sounds",
    "years/seasons/cmsc142",
    "years/seasons/cmsc141",
    "months/2023",
    "months/2023/september",
    "seasons/2023",
    "seasons/2023/autumn",
    "weeks/2023",
    "weeks/2023/36th",
    "weeks/2023/36th/aw23",
    "weeks/2023/36th/aw23/september",
    "weeks/2023/36th/aw23/september/fourth",
    "weeks/2023/36th/aw23/september/fifth",
    "weeks/2023/36th/aw23/september/fourth/11thhour",
    "weeks/2023/36th/aw23/september/fourth/11thhour/59thminute",
    "weeks/2023/36th/aw23/september/fourth/11thhour/59thminute/59thsecond",
    "weeks/2023/36th/aw23/september/fourth/11thhour/59thminute/59thsecond/secondlastmilisecond",
    ETERNAL,
];

const FILES: &[(&str, &str)] = &[
    (
        "weeks/2023/36th/aw23/september/fourth/11thhour/59thminute/59thsecond/secondlastmilisecond/this_moment_is_eternal/rootfile.txt",
        "Everything below here is deep on purpose.",
    ),
    ("years/seasons/cmsc141/autumnwinter.txt", "Autumn/winter teaser\nimages to follow"),
    ("years/seasons/cmsc142/audio.txt", "Autumn/winter soundtrack\n\n1. opening\n2. closing"),
    ("years/2023/cmsc142/autumnwinter.txt", "Autumn/winter teaser\nimages to follow"),
    ("years/2023/cmsc142/audio.txt", "Autumn/winter soundtrack\n\n1. opening\n2. closing"),
    ("years/seasons/txt/colour.txt", "Colour palette\ncharcoal 30292f\nviolet 5f5aa2\nslate 3f4045"),
    ("years/seasons/txt/studiodeliverooorder.txt", "olives 4.80\nsoup 11.00\nbread 3.50"),
    ("years/seasons/images/inscribe.txt", "Notes on a trip west,\nwritten months later."),
    ("years/seasons/sounds/annoucement.txt", "The first collection is revealed in September."),
];

/// Fills `fs` with the sample directories and files.
pub fn populate(fs: &mut VirtualFileSystem) -> Result<()> {
    let session = fs.session();
    for dir in DIRECTORIES {
        fs.mkdir(&session, dir)?;
    }
    for &(path, contents) in FILES {
        fs.cat(&session, CatMode::Overwrite, path, Some(contents))?;
    }
    tracing::info!(
        "Seeded filesystem with {} directories and {} files",
        DIRECTORIES.len(),
        FILES.len()
    );
    Ok(())
}
