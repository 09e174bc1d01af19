use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

// Foreign keys are declared RESTRICT on purpose: cascade deletion is done
// explicitly (and transactionally) by the store, so a delete that skips the
// dependent rows is a bug the database should catch, not paper over.
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Album::Table)
                    .if_not_exists()
                    .col(pk_auto(Album::Id))
                    .col(string_len(Album::Name, 90))
                    .col(string_null(Album::Image))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Gender::Table)
                    .if_not_exists()
                    .col(pk_auto(Gender::Id))
                    .col(string_len(Gender::Name, 50))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Artist::Table)
                    .if_not_exists()
                    .col(pk_auto(Artist::Id))
                    .col(string_len_null(Artist::Alias, 50))
                    .col(string_len_null(Artist::FirstName, 50))
                    .col(string_len_null(Artist::LastName, 50))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Playlist::Table)
                    .if_not_exists()
                    .col(pk_auto(Playlist::Id))
                    .col(string_len(Playlist::Name, 50))
                    .col(integer(Playlist::Owner))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Track::Table)
                    .if_not_exists()
                    .col(pk_auto(Track::Id))
                    .col(string(Track::File))
                    .col(string_len(Track::Name, 30))
                    .col(unsigned_null(Track::Duration))
                    .col(timestamp_with_time_zone(Track::UploadDate))
                    .col(integer_null(Track::AlbumId))
                    .foreign_key(
                        ForeignKey::create()
                            .from(Track::Table, Track::AlbumId)
                            .to(Album::Table, Album::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TrackArtist::Table)
                    .if_not_exists()
                    .col(integer(TrackArtist::TrackId))
                    .col(integer(TrackArtist::ArtistId))
                    .primary_key(
                        Index::create()
                            .col(TrackArtist::TrackId)
                            .col(TrackArtist::ArtistId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TrackArtist::Table, TrackArtist::TrackId)
                            .to(Track::Table, Track::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TrackArtist::Table, TrackArtist::ArtistId)
                            .to(Artist::Table, Artist::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TrackGender::Table)
                    .if_not_exists()
                    .col(integer(TrackGender::TrackId))
                    .col(integer(TrackGender::GenderId))
                    .primary_key(
                        Index::create()
                            .col(TrackGender::TrackId)
                            .col(TrackGender::GenderId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TrackGender::Table, TrackGender::TrackId)
                            .to(Track::Table, Track::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TrackGender::Table, TrackGender::GenderId)
                            .to(Gender::Table, Gender::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PlaylistTrack::Table)
                    .if_not_exists()
                    .col(integer(PlaylistTrack::PlaylistId))
                    .col(integer(PlaylistTrack::TrackId))
                    .primary_key(
                        Index::create()
                            .col(PlaylistTrack::PlaylistId)
                            .col(PlaylistTrack::TrackId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(PlaylistTrack::Table, PlaylistTrack::PlaylistId)
                            .to(Playlist::Table, Playlist::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(PlaylistTrack::Table, PlaylistTrack::TrackId)
                            .to(Track::Table, Track::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PlaylistTrack::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TrackGender::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TrackArtist::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Track::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Playlist::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Artist::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Gender::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Album::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Album {
    Table,
    Id,
    Name,
    Image,
}

#[derive(DeriveIden)]
enum Gender {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Artist {
    Table,
    Id,
    Alias,
    FirstName,
    LastName,
}

#[derive(DeriveIden)]
enum Playlist {
    Table,
    Id,
    Name,
    Owner,
}

#[derive(DeriveIden)]
enum Track {
    Table,
    Id,
    File,
    Name,
    Duration,
    UploadDate,
    AlbumId,
}

#[derive(DeriveIden)]
enum TrackArtist {
    Table,
    TrackId,
    ArtistId,
}

#[derive(DeriveIden)]
enum TrackGender {
    Table,
    TrackId,
    GenderId,
}

#[derive(DeriveIden)]
enum PlaylistTrack {
    Table,
    PlaylistId,
    TrackId,
}
