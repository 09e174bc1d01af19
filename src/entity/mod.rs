pub mod album;
pub mod artist;
pub mod gender;
pub mod playlist;
pub mod playlist_track;
pub mod track;
pub mod track_artist;
pub mod track_gender;
