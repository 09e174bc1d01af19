use camino::Utf8Path;
use tracing::trace;

use super::Error;

/// Playback length of an MP3 file in whole seconds.
///
/// Parses the whole frame stream synchronously, so the enclosing save blocks
/// until it is done. Corrupt, non-MPEG or unreadable input is an error; the
/// save is aborted rather than persisting a made-up duration.
pub(crate) fn probe(path: &Utf8Path) -> Result<u32, Error> {
    let duration = mp3_duration::from_path(path).map_err(|source| Error::UnparseableAudio {
        path: path.to_owned(),
        source,
    })?;
    trace!("{path}: {duration:?}");
    Ok(duration.as_secs() as u32)
}
