use std::{env, io, path::PathBuf};

use anyhow::Result;

/// Default storage root when the user doesn't pass `--dir`. Data files live
/// next to each other in one flat directory the user can point any editor at.
pub fn default_storage_root() -> Result<PathBuf> {
    let path = {
        cfg_if::cfg_if! {
            if #[cfg(windows)] {
                let mut path = PathBuf::from(
                    env::var("APPDATA").expect("APPDATA should be present on Windows"),
                );
                path.push("hoursme");
                path
            } else {
                let mut path = env::var("XDG_DATA_HOME")
                    .map(PathBuf::from)
                    .or_else(|_| {
                        env::var("HOME").map(|home| {
                            let mut path = PathBuf::from(home);
                            path.push(".local/share");
                            path
                        })
                    })
                    .expect("Couldn't find neither XDG_DATA_HOME nor HOME");
                path.push("hoursme");
                path
            }
        }
    };

    match std::fs::create_dir_all(&path) {
        Ok(_) => Ok(path),
        Err(v) if v.kind() == io::ErrorKind::AlreadyExists => Ok(path),
        Err(v) => Err(v.into()),
    }
}
