use crackserver_core::Error;
use std::process::ExitCode;

/// Process exit statuses reported by the `crackserver` binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitStatus {
    Usage = 1,
    DictionaryOpen = 2,
    DictionaryEmpty = 3,
    Socket = 4,
}

impl ExitStatus {
    /// Maps a startup failure onto its exit status. Anything that is not a
    /// dictionary or socket error is treated as a usage error.
    pub fn of(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<Error>() {
            Some(Error::DictionaryOpen { .. }) => Self::DictionaryOpen,
            Some(Error::DictionaryEmpty { .. }) => Self::DictionaryEmpty,
            Some(Error::Bind { .. }) => Self::Socket,
            _ => Self::Usage,
        }
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        Self::from(status as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{io, path::PathBuf};

    #[test]
    fn startup_errors_map_to_distinct_statuses() {
        let open = anyhow::Error::new(Error::DictionaryOpen {
            path: PathBuf::from("/nope"),
            source: io::Error::from(io::ErrorKind::NotFound),
        });
        let empty = anyhow::Error::new(Error::DictionaryEmpty {
            path: PathBuf::from("/empty"),
        });
        let bind = anyhow::Error::new(Error::Bind {
            addr: "0.0.0.0:1".into(),
            source: io::Error::from(io::ErrorKind::AddrInUse),
        });

        assert_eq!(ExitStatus::of(&open), ExitStatus::DictionaryOpen);
        assert_eq!(ExitStatus::of(&empty), ExitStatus::DictionaryEmpty);
        assert_eq!(ExitStatus::of(&bind), ExitStatus::Socket);
        assert_eq!(ExitStatus::of(&anyhow::anyhow!("bad port")), ExitStatus::Usage);
        assert_eq!(ExitStatus::Socket as u8, 4);
    }
}
