use camino::Utf8PathBuf;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue as AV, ColumnTrait, ConnectOptions, ConnectionTrait, Database,
    DatabaseConnection, DbErr, EntityTrait, ModelTrait, QueryFilter, TransactionTrait,
    TryIntoModel,
};
use sea_orm_migration::MigratorTrait;
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    config::Config,
    entity::{album, artist, gender, playlist, playlist_track, track, track_artist, track_gender},
    media::MediaDir,
};

mod duration;
mod migration;

#[derive(Debug, Error)]
pub enum Error {
    #[error("database: {0}")]
    Db(#[from] DbErr),
    #[error("cannot parse {path} as mp3 audio")]
    UnparseableAudio {
        path: Utf8PathBuf,
        source: mp3_duration::MP3DurationError,
    },
    #[error("track has no file set")]
    MissingFile,
}

/// A new upload about to become a track row.
#[derive(Debug, Clone)]
pub struct NewTrack {
    /// relative to the upload root, as returned by [`MediaDir::store_track`]
    pub file: Utf8PathBuf,
    pub name: String,
    pub album: Option<i32>,
}

#[derive(Debug, Clone, Default)]
pub struct NewArtist {
    pub alias: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// The music library: a sqlite database plus the media directory its track
/// rows point into.
///
/// Referential integrity lives in the schema (RESTRICT foreign keys, join
/// pairs as composite primary keys); cascade deletion is performed here,
/// explicitly, one transaction per deleted parent.
pub struct Store {
    connection: DatabaseConnection,
    media: MediaDir,
}

impl Store {
    /// Open (or create) `mixtape.sqlite` under the configured data path and
    /// bring the schema up to date.
    pub async fn new(config: &Config) -> Result<Self, Error> {
        let db_url = format!("sqlite://{}/mixtape.sqlite?mode=rwc", config.system.data_path);
        debug!("database URL: {db_url}");
        Self::open(&db_url, config.media.upload_root.clone()).await
    }

    pub async fn open(db_url: &str, upload_root: impl Into<Utf8PathBuf>) -> Result<Self, Error> {
        let mut opts = ConnectOptions::new(db_url);
        opts.sqlx_logging(true)
            .sqlx_logging_level(log::LevelFilter::Debug);

        let connection = Database::connect(opts).await?;
        migration::Migrator::up(&connection, None).await?;

        Ok(Self {
            connection,
            media: MediaDir::new(upload_root),
        })
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.connection
    }

    pub fn media(&self) -> &MediaDir {
        &self.media
    }

    // ----- tracks ---------------------------------------------------------

    /// Insert a freshly uploaded track. `upload_date` is set here, once.
    pub async fn create_track(&self, new: NewTrack) -> Result<track::Model, Error> {
        let track = track::ActiveModel {
            file: AV::Set(new.file.into_string()),
            name: AV::Set(new.name),
            album_id: AV::Set(new.album),
            upload_date: AV::Set(Utc::now()),
            ..Default::default()
        };
        self.save_track(track).await
    }

    /// Persist a track, new or updated.
    ///
    /// The duration is recomputed from the current file before every write,
    /// even when only unrelated fields changed, so the stored value always
    /// reflects the audio on disk. The parse runs synchronously inside this
    /// call; a file that is not valid MPEG audio aborts the save.
    pub async fn save_track(&self, mut track: track::ActiveModel) -> Result<track::Model, Error> {
        let file = match &track.file {
            AV::Set(file) | AV::Unchanged(file) => self.media.resolve(file),
            AV::NotSet => return Err(Error::MissingFile),
        };
        track.duration = AV::Set(Some(duration::probe(&file)?));
        Ok(track.save(&self.connection).await?.try_into_model()?)
    }

    /// Delete a track row and, once the delete has committed, its file.
    ///
    /// Idempotent on both halves: an id that is already gone and a file that
    /// is already gone are silent successes.
    pub async fn delete_track(&self, id: i32) -> Result<(), Error> {
        let Some(track) = track::Entity::find_by_id(id).one(&self.connection).await? else {
            debug!("track {id} already gone");
            return Ok(());
        };

        let txn = self.connection.begin().await?;
        unlink_track(&txn, id).await?;
        track::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        self.cleanup(&track).await;
        Ok(())
    }

    /// Best-effort file removal after a committed delete. The row is gone
    /// either way, so a failure here is logged, not surfaced.
    async fn cleanup(&self, track: &track::Model) {
        if let Err(e) = self.media.remove(&track.file).await {
            warn!("removing {}: {e}", track.file);
        }
    }

    // ----- albums ---------------------------------------------------------

    pub async fn create_album(
        &self,
        name: impl Into<String>,
        image: Option<String>,
    ) -> Result<album::Model, Error> {
        let album = album::ActiveModel {
            name: AV::Set(name.into()),
            image: AV::Set(image),
            ..Default::default()
        };
        Ok(album.insert(&self.connection).await?)
    }

    /// Delete an album and everything it owns: its tracks, their association
    /// rows and, after commit, their files.
    pub async fn delete_album(&self, id: i32) -> Result<(), Error> {
        let tracks = track::Entity::find()
            .filter(track::Column::AlbumId.eq(id))
            .all(&self.connection)
            .await?;

        let txn = self.connection.begin().await?;
        for track in &tracks {
            unlink_track(&txn, track.id).await?;
        }
        track::Entity::delete_many()
            .filter(track::Column::AlbumId.eq(id))
            .exec(&txn)
            .await?;
        album::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        for track in &tracks {
            self.cleanup(track).await;
        }
        Ok(())
    }

    // ----- genders / artists / playlists -----------------------------------

    pub async fn create_gender(&self, name: impl Into<String>) -> Result<gender::Model, Error> {
        let gender = gender::ActiveModel {
            name: AV::Set(name.into()),
            ..Default::default()
        };
        Ok(gender.insert(&self.connection).await?)
    }

    pub async fn delete_gender(&self, id: i32) -> Result<(), Error> {
        let txn = self.connection.begin().await?;
        track_gender::Entity::delete_many()
            .filter(track_gender::Column::GenderId.eq(id))
            .exec(&txn)
            .await?;
        gender::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;
        Ok(())
    }

    pub async fn create_artist(&self, new: NewArtist) -> Result<artist::Model, Error> {
        let artist = artist::ActiveModel {
            alias: AV::Set(new.alias),
            first_name: AV::Set(new.first_name),
            last_name: AV::Set(new.last_name),
            ..Default::default()
        };
        Ok(artist.insert(&self.connection).await?)
    }

    pub async fn delete_artist(&self, id: i32) -> Result<(), Error> {
        let txn = self.connection.begin().await?;
        track_artist::Entity::delete_many()
            .filter(track_artist::Column::ArtistId.eq(id))
            .exec(&txn)
            .await?;
        artist::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;
        Ok(())
    }

    pub async fn create_playlist(
        &self,
        name: impl Into<String>,
        owner: i32,
    ) -> Result<playlist::Model, Error> {
        let playlist = playlist::ActiveModel {
            name: AV::Set(name.into()),
            owner: AV::Set(owner),
            ..Default::default()
        };
        Ok(playlist.insert(&self.connection).await?)
    }

    pub async fn delete_playlist(&self, id: i32) -> Result<(), Error> {
        let txn = self.connection.begin().await?;
        playlist_track::Entity::delete_many()
            .filter(playlist_track::Column::PlaylistId.eq(id))
            .exec(&txn)
            .await?;
        playlist::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;
        Ok(())
    }

    /// The cascade a user deletion triggers: every playlist of that owner
    /// goes, membership rows first. The user record itself lives elsewhere.
    pub async fn delete_owner_playlists(&self, owner: i32) -> Result<(), Error> {
        let playlists = playlist::Entity::find()
            .filter(playlist::Column::Owner.eq(owner))
            .all(&self.connection)
            .await?;

        let txn = self.connection.begin().await?;
        for playlist in &playlists {
            playlist_track::Entity::delete_many()
                .filter(playlist_track::Column::PlaylistId.eq(playlist.id))
                .exec(&txn)
                .await?;
        }
        playlist::Entity::delete_many()
            .filter(playlist::Column::Owner.eq(owner))
            .exec(&txn)
            .await?;
        txn.commit().await?;
        Ok(())
    }

    // ----- associations -----------------------------------------------------

    /// Duplicate pairs come back as a unique constraint violation in
    /// [`Error::Db`]; same for the other two pair tables.
    pub async fn add_track_artist(
        &self,
        track: i32,
        artist: i32,
    ) -> Result<track_artist::Model, Error> {
        let row = track_artist::ActiveModel {
            track_id: AV::Set(track),
            artist_id: AV::Set(artist),
        };
        Ok(row.insert(&self.connection).await?)
    }

    pub async fn remove_track_artist(&self, track: i32, artist: i32) -> Result<(), Error> {
        track_artist::Entity::delete_many()
            .filter(track_artist::Column::TrackId.eq(track))
            .filter(track_artist::Column::ArtistId.eq(artist))
            .exec(&self.connection)
            .await?;
        Ok(())
    }

    pub async fn add_track_gender(
        &self,
        track: i32,
        gender: i32,
    ) -> Result<track_gender::Model, Error> {
        let row = track_gender::ActiveModel {
            track_id: AV::Set(track),
            gender_id: AV::Set(gender),
        };
        Ok(row.insert(&self.connection).await?)
    }

    pub async fn remove_track_gender(&self, track: i32, gender: i32) -> Result<(), Error> {
        track_gender::Entity::delete_many()
            .filter(track_gender::Column::TrackId.eq(track))
            .filter(track_gender::Column::GenderId.eq(gender))
            .exec(&self.connection)
            .await?;
        Ok(())
    }

    pub async fn add_playlist_track(
        &self,
        playlist: i32,
        track: i32,
    ) -> Result<playlist_track::Model, Error> {
        let row = playlist_track::ActiveModel {
            playlist_id: AV::Set(playlist),
            track_id: AV::Set(track),
        };
        Ok(row.insert(&self.connection).await?)
    }

    pub async fn remove_playlist_track(&self, playlist: i32, track: i32) -> Result<(), Error> {
        playlist_track::Entity::delete_many()
            .filter(playlist_track::Column::PlaylistId.eq(playlist))
            .filter(playlist_track::Column::TrackId.eq(track))
            .exec(&self.connection)
            .await?;
        Ok(())
    }

    // ----- queries ----------------------------------------------------------

    pub async fn track(&self, id: i32) -> Result<Option<track::Model>, Error> {
        Ok(track::Entity::find_by_id(id).one(&self.connection).await?)
    }

    pub async fn album_tracks(&self, album: &album::Model) -> Result<Vec<track::Model>, Error> {
        Ok(album.find_related(track::Entity).all(&self.connection).await?)
    }

    pub async fn track_artists(&self, track: &track::Model) -> Result<Vec<artist::Model>, Error> {
        Ok(track.find_related(artist::Entity).all(&self.connection).await?)
    }

    pub async fn track_genders(&self, track: &track::Model) -> Result<Vec<gender::Model>, Error> {
        Ok(track.find_related(gender::Entity).all(&self.connection).await?)
    }

    pub async fn playlist_tracks(
        &self,
        playlist: &playlist::Model,
    ) -> Result<Vec<track::Model>, Error> {
        Ok(playlist
            .find_related(track::Entity)
            .all(&self.connection)
            .await?)
    }
}

/// Drop every association row referencing a track, inside the caller's
/// transaction. Must run before the track row itself goes (RESTRICT keys).
async fn unlink_track<C: ConnectionTrait>(db: &C, id: i32) -> Result<(), DbErr> {
    playlist_track::Entity::delete_many()
        .filter(playlist_track::Column::TrackId.eq(id))
        .exec(db)
        .await?;
    track_gender::Entity::delete_many()
        .filter(track_gender::Column::TrackId.eq(id))
        .exec(db)
        .await?;
    track_artist::Entity::delete_many()
        .filter(track_artist::Column::TrackId.eq(id))
        .exec(db)
        .await?;
    Ok(())
}
