use crate::{Cursor, DecodeError, SYNC_WINDOW, SYNC_WORD};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncStatus {
    /// The sync word was found; the position right past it.
    Found(usize),
    /// No sync word in the search window; decoding carries on from offset 0.
    Degraded,
    /// The container holds a bare packet stream that is not preceded by a sync word.
    NotScanned,
}

/// Scans byte by byte for the sync word and returns the offset just past it.
///
/// Only matches starting in the first [`SYNC_WINDOW`] bytes count.
pub fn find_sync(data: &[u8]) -> Result<usize, DecodeError> {
    let cursor = Cursor::new(data);
    for offset in 0..SYNC_WINDOW {
        let Ok(word) = cursor.read_word_at(offset) else {
            break;
        };
        if word == SYNC_WORD {
            return Ok(offset + 4);
        }
    }
    Err(DecodeError::SyncNotFound {
        window: SYNC_WINDOW,
    })
}

/// Positions the cursor just past the sync word, or at 0 when there is none.
pub fn sync(cursor: &mut Cursor) -> Result<SyncStatus, DecodeError> {
    match find_sync(cursor.data()) {
        Ok(pos) => {
            cursor.seek(pos)?;
            log::info!("sync word found, stream starts at 0x{pos:x}");
            Ok(SyncStatus::Found(pos))
        }
        Err(e @ DecodeError::SyncNotFound { .. }) => {
            log::warn!("{e}, decoding from offset 0");
            cursor.seek(0)?;
            Ok(SyncStatus::Degraded)
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn with_sync_at(k: usize, len: usize) -> Vec<u8> {
        let mut data = vec![0xff; len];
        data[k..k + 4].copy_from_slice(&SYNC_WORD.to_be_bytes());
        data
    }

    #[test]
    fn found_at_any_byte_offset() {
        for k in [0, 1, 2, 3, 7, 0x20, 250, 499] {
            assert_eq!(find_sync(&with_sync_at(k, 600)), Ok(k + 4), "sync at {k}");
        }
    }

    #[test]
    fn first_match_wins() {
        let mut data = with_sync_at(16, 64);
        data[40..44].copy_from_slice(&SYNC_WORD.to_be_bytes());
        assert_eq!(find_sync(&data), Ok(20));
    }

    #[test]
    fn outside_window() {
        assert_matches!(
            find_sync(&with_sync_at(500, 600)),
            Err(DecodeError::SyncNotFound { window: 500 })
        );
        assert_matches!(
            find_sync(&with_sync_at(510, 600)),
            Err(DecodeError::SyncNotFound { .. })
        );
    }

    #[test]
    fn short_or_missing() {
        assert_matches!(find_sync(&[]), Err(DecodeError::SyncNotFound { .. }));
        assert_matches!(find_sync(&[0xaa, 0x99, 0x55]), Err(DecodeError::SyncNotFound { .. }));
        assert_matches!(find_sync(&[0u8; 64]), Err(DecodeError::SyncNotFound { .. }));
        assert_eq!(find_sync(&SYNC_WORD.to_be_bytes()), Ok(4));
    }

    #[test]
    fn degraded_mode_rewinds() {
        let data = [0u8; 32];
        let mut cursor = Cursor::at(&data, 8).unwrap();
        assert_eq!(sync(&mut cursor), Ok(SyncStatus::Degraded));
        assert_eq!(cursor.pos(), 0);

        let data = with_sync_at(6, 32);
        let mut cursor = Cursor::new(&data);
        assert_eq!(sync(&mut cursor), Ok(SyncStatus::Found(10)));
        assert_eq!(cursor.pos(), 10);
    }
}
