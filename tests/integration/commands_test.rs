// tests/integration/commands_test.rs

//! Typed command groups against the scripted daemon.

use super::test_helpers::TestContext;
use mpdpipe::core::commands::{Filter, ReplayGainMode, Single};
use mpdpipe::core::objects::{DirectoryEntry, PlayState};
use std::time::Duration;

/// Runs `call` while the daemon answers `expected` with `response`.
macro_rules! exchange {
    ($ctx:expr, $call:expr, $expected:expr, $response:expr) => {{
        let client = $ctx.client.clone();
        let handle = tokio::spawn(async move {
            let client = client;
            $call(client).await
        });
        $ctx.daemon.wake().await;
        $ctx.daemon.expect($expected).await;
        $ctx.daemon.send($response).await;
        let result = handle.await.unwrap();
        $ctx.daemon.expect("idle").await;
        result
    }};
}

#[tokio::test]
async fn status_group() {
    let mut ctx = TestContext::ready().await;

    let status = exchange!(
        ctx,
        |c: mpdpipe::MpdClient| async move { c.status().status().await },
        "status",
        "volume: 30\nrepeat: 1\nstate: pause\nsong: 2\nelapsed: 7.25\nOK\n"
    )
    .unwrap();
    assert_eq!(status.state, Some(PlayState::Pause));
    assert_eq!(status.volume, Some(30));
    assert_eq!(status.song, Some(2));
    assert!(status.repeat);

    let current = exchange!(
        ctx,
        |c: mpdpipe::MpdClient| async move { c.status().current_song().await },
        "currentsong",
        "OK\n"
    )
    .unwrap();
    assert!(current.is_none());

    let current = exchange!(
        ctx,
        |c: mpdpipe::MpdClient| async move { c.status().current_song().await },
        "currentsong",
        "file: jazz/so_what.flac\nTitle: So What\nPos: 0\nId: 7\nOK\n"
    )
    .unwrap()
    .unwrap();
    assert_eq!(current.song.title.as_deref(), Some("So What"));
    assert_eq!(current.id, Some(7));

    let stats = exchange!(
        ctx,
        |c: mpdpipe::MpdClient| async move { c.status().statistics().await },
        "stats",
        "artists: 2\nalbums: 5\nsongs: 40\nuptime: 120\nOK\n"
    )
    .unwrap();
    assert_eq!(stats.songs, Some(40));
    assert_eq!(stats.uptime, Some(Duration::from_secs(120)));

    exchange!(
        ctx,
        |c: mpdpipe::MpdClient| async move { c.status().clear_error().await },
        "clearerror",
        "OK\n"
    )
    .unwrap();
}

#[tokio::test]
async fn playback_group_renders_arguments() {
    let mut ctx = TestContext::ready().await;

    exchange!(
        ctx,
        |c: mpdpipe::MpdClient| async move { c.playback().play(Some(3)).await },
        "play 3",
        "OK\n"
    )
    .unwrap();
    exchange!(
        ctx,
        |c: mpdpipe::MpdClient| async move { c.playback().play(None).await },
        "play",
        "OK\n"
    )
    .unwrap();
    exchange!(
        ctx,
        |c: mpdpipe::MpdClient| async move { c.playback().pause(true).await },
        "pause 1",
        "OK\n"
    )
    .unwrap();
    exchange!(
        ctx,
        |c: mpdpipe::MpdClient| async move {
            c.playback().seek_id(9, Duration::from_millis(1500)).await
        },
        "seekid 9 1.500",
        "OK\n"
    )
    .unwrap();
    exchange!(
        ctx,
        |c: mpdpipe::MpdClient| async move { c.playback().seek_cur(-5.0, true).await },
        "seekcur -5.000",
        "OK\n"
    )
    .unwrap();
    exchange!(
        ctx,
        |c: mpdpipe::MpdClient| async move { c.playback().seek_cur(10.0, true).await },
        "seekcur +10.000",
        "OK\n"
    )
    .unwrap();

    let err = exchange!(
        ctx,
        |c: mpdpipe::MpdClient| async move { c.playback().play_id(404).await },
        "playid 404",
        "ACK [50@0] {playid} No such song\n"
    )
    .unwrap_err();
    assert_eq!(err.error_code(), Some(50));
}

#[tokio::test]
async fn connection_group() {
    let mut ctx = TestContext::ready().await;

    exchange!(
        ctx,
        |c: mpdpipe::MpdClient| async move { c.connection().ping().await },
        "ping",
        "OK\n"
    )
    .unwrap();

    let tags = exchange!(
        ctx,
        |c: mpdpipe::MpdClient| async move { c.connection().tag_types().await },
        "tagtypes",
        "tagtype: Artist\ntagtype: Album\ntagtype: Title\nOK\n"
    )
    .unwrap();
    assert_eq!(tags, vec!["Artist", "Album", "Title"]);
}

#[tokio::test]
async fn database_group() {
    let mut ctx = TestContext::ready().await;

    let songs = exchange!(
        ctx,
        |c: mpdpipe::MpdClient| async move {
            c.database()
                .find(&[Filter::new("Artist", "Miles Davis")], Some(0..2))
                .await
        },
        r#"find Artist "Miles Davis" window 0:2"#,
        "file: a.flac\nTitle: So What\nGenre: Jazz\nGenre: Modal\nfile: b.flac\nTitle: Blue in Green\nOK\n"
    )
    .unwrap();
    assert_eq!(songs.len(), 2);
    assert_eq!(songs[0].genre.as_deref(), Some("Jazz;Modal"));
    assert_eq!(songs[1].file, "b.flac");

    let entries = exchange!(
        ctx,
        |c: mpdpipe::MpdClient| async move { c.database().list_info(Some("My Music")).await },
        r#"lsinfo "My Music""#,
        "directory: My Music/Live\nfile: My Music/track.mp3\nplaylist: My Music/best.m3u\nOK\n"
    )
    .unwrap();
    assert_eq!(entries.len(), 3);
    assert!(matches!(entries[0], DirectoryEntry::Directory { .. }));
    assert!(matches!(entries[1], DirectoryEntry::Song(_)));
    assert_eq!(entries[2].path(), "My Music/best.m3u");

    let count = exchange!(
        ctx,
        |c: mpdpipe::MpdClient| async move {
            c.database().count(&[Filter::new("Genre", "Jazz")]).await
        },
        "count Genre Jazz",
        "songs: 14\nplaytime: 4200\nOK\n"
    )
    .unwrap();
    assert_eq!(count.songs, 14);
    assert_eq!(count.playtime, Duration::from_secs(4200));

    let albums = exchange!(
        ctx,
        |c: mpdpipe::MpdClient| async move { c.database().list_grouped("Album", "AlbumArtist").await },
        "list Album group AlbumArtist",
        "AlbumArtist: Miles Davis\nAlbum: Kind of Blue\nAlbum: Bitches Brew\nAlbumArtist: Bill Evans\nAlbum: Sunday at the Village Vanguard\nOK\n"
    )
    .unwrap();
    assert_eq!(
        albums.keys().collect::<Vec<_>>(),
        vec!["Miles Davis", "Bill Evans"]
    );
    assert_eq!(albums["Miles Davis"], vec!["Kind of Blue", "Bitches Brew"]);

    let artists = exchange!(
        ctx,
        |c: mpdpipe::MpdClient| async move { c.database().list("Artist").await },
        "list Artist",
        "Artist: Bill Evans\nArtist: Miles Davis\nOK\n"
    )
    .unwrap();
    assert_eq!(artists, vec!["Bill Evans", "Miles Davis"]);
}

#[tokio::test]
async fn current_playlist_group() {
    let mut ctx = TestContext::ready().await;

    let id = exchange!(
        ctx,
        |c: mpdpipe::MpdClient| async move {
            c.current_playlist().add_id("jazz/so what.flac", Some(0)).await
        },
        r#"addid "jazz/so what.flac" 0"#,
        "Id: 31\nOK\n"
    )
    .unwrap();
    assert_eq!(id, 31);

    exchange!(
        ctx,
        |c: mpdpipe::MpdClient| async move { c.current_playlist().add("jazz").await },
        "add jazz",
        "OK\n"
    )
    .unwrap();
    exchange!(
        ctx,
        |c: mpdpipe::MpdClient| async move { c.current_playlist().delete_range(2..4).await },
        "delete 2:4",
        "OK\n"
    )
    .unwrap();
    exchange!(
        ctx,
        |c: mpdpipe::MpdClient| async move { c.current_playlist().move_song(3, 0).await },
        "move 3 0",
        "OK\n"
    )
    .unwrap();
    exchange!(
        ctx,
        |c: mpdpipe::MpdClient| async move { c.current_playlist().shuffle(None).await },
        "shuffle",
        "OK\n"
    )
    .unwrap();
    exchange!(
        ctx,
        |c: mpdpipe::MpdClient| async move { c.current_playlist().prio(5, 0..3).await },
        "prio 5 0:3",
        "OK\n"
    )
    .unwrap();

    let queue = exchange!(
        ctx,
        |c: mpdpipe::MpdClient| async move { c.current_playlist().playlist_info(None).await },
        "playlistinfo",
        "file: a.flac\nPos: 0\nId: 31\nfile: b.flac\nPos: 1\nId: 32\nPrio: 5\nOK\n"
    )
    .unwrap();
    assert_eq!(queue.len(), 2);
    assert_eq!(queue[0].id, Some(31));
    assert_eq!(queue[1].position, Some(1));
    assert_eq!(queue[1].priority, Some(5));

    let missing = exchange!(
        ctx,
        |c: mpdpipe::MpdClient| async move { c.current_playlist().playlist_id(99).await },
        "playlistid 99",
        "ACK [50@0] {playlistid} No such song\n"
    )
    .unwrap_err();
    assert_eq!(missing.error_code(), Some(50));

    let found = exchange!(
        ctx,
        |c: mpdpipe::MpdClient| async move {
            c.current_playlist().playlist_search("Title", "blue").await
        },
        "playlistsearch Title blue",
        "file: b.flac\nTitle: Blue in Green\nPos: 1\nId: 32\nOK\n"
    )
    .unwrap();
    assert_eq!(found[0].song.title.as_deref(), Some("Blue in Green"));

    let err = exchange!(
        ctx,
        |c: mpdpipe::MpdClient| async move { c.current_playlist().add_id("c.flac", None).await },
        "addid c.flac",
        "OK\n"
    )
    .unwrap_err();
    assert!(matches!(err, mpdpipe::MpdError::Protocol(_)));
}

#[tokio::test]
async fn playback_options_group() {
    let mut ctx = TestContext::ready().await;

    exchange!(
        ctx,
        |c: mpdpipe::MpdClient| async move { c.playback_options().set_volume(140).await },
        "setvol 100",
        "OK\n"
    )
    .unwrap();
    exchange!(
        ctx,
        |c: mpdpipe::MpdClient| async move { c.playback_options().set_random(true).await },
        "random 1",
        "OK\n"
    )
    .unwrap();
    exchange!(
        ctx,
        |c: mpdpipe::MpdClient| async move { c.playback_options().set_consume(false).await },
        "consume 0",
        "OK\n"
    )
    .unwrap();
    exchange!(
        ctx,
        |c: mpdpipe::MpdClient| async move { c.playback_options().set_single(Single::Oneshot).await },
        "single oneshot",
        "OK\n"
    )
    .unwrap();
    exchange!(
        ctx,
        |c: mpdpipe::MpdClient| async move { c.playback_options().set_crossfade(4).await },
        "crossfade 4",
        "OK\n"
    )
    .unwrap();
    exchange!(
        ctx,
        |c: mpdpipe::MpdClient| async move { c.playback_options().set_mixramp_db(-17.5).await },
        "mixrampdb -17.5",
        "OK\n"
    )
    .unwrap();
    exchange!(
        ctx,
        |c: mpdpipe::MpdClient| async move { c.playback_options().set_mixramp_delay(None).await },
        "mixrampdelay nan",
        "OK\n"
    )
    .unwrap();
    exchange!(
        ctx,
        |c: mpdpipe::MpdClient| async move {
            c.playback_options()
                .set_replay_gain_mode(ReplayGainMode::Album)
                .await
        },
        "replay_gain_mode album",
        "OK\n"
    )
    .unwrap();

    let mode = exchange!(
        ctx,
        |c: mpdpipe::MpdClient| async move { c.playback_options().replay_gain_mode().await },
        "replay_gain_status",
        "replay_gain_mode: track\nOK\n"
    )
    .unwrap();
    assert_eq!(mode, ReplayGainMode::Track);
}
