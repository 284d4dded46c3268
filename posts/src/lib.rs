//! The two scripts behind the posts: a linear fit of radioactive decay and a tumour classifier.

use std::{env, fs, io, path::PathBuf};

use env_logger::{Builder, Env};

pub mod cancer;
pub mod decay;

const DEFAULT_OUT_DIR: &str = "out";

/// The console logger of the binaries, `info` unless `RUST_LOG` says otherwise.
pub fn logger() -> Builder {
    Builder::from_env(Env::default().default_filter_or("info"))
}

/// The directory plots and histories are written to, `OUT_DIR_POSTS` or `out/`.
///
/// The directory is created if it doesn't exist.
pub fn out_dir() -> io::Result<PathBuf> {
    let dir = env::var("OUT_DIR_POSTS").unwrap_or_else(|_| DEFAULT_OUT_DIR.to_string());
    let dir = PathBuf::from(dir);

    fs::create_dir_all(&dir)?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use std::{
        io::Write,
        sync::{Arc, Mutex},
    };

    use env_logger::{Target, WriteStyle};
    use log::{Level, Log, Record};

    use super::*;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn logger_prints_key_value_fields() {
        let captured = Captured::default();
        let logger = logger()
            .target(Target::Pipe(Box::new(captured.clone())))
            .write_style(WriteStyle::Never)
            .build();

        let fields = ("train", 398usize);
        logger.log(
            &Record::builder()
                .level(Level::Info)
                .target("posts::cancer")
                .args(format_args!("partitioned the samples"))
                .key_values(&fields)
                .build(),
        );
        logger.flush();

        let line = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(line.contains("partitioned the samples"), "{line}");
        assert!(line.contains("train"), "{line}");
        assert!(line.contains("398"), "{line}");
    }
}
