use assert_matches::assert_matches;
use pretty_assertions::assert_eq;
use std::borrow::Cow;
use test_case::test_case;

use tunebot::commands::music::audio_sources::{
    AudioResolver, ExtractedInfo, ResolveError, ResolvedTrack, SEARCH_PREFIX, YtDlp, first_entry,
    is_url, search_term,
};

use crate::common::fixtures::{EMPTY_SEARCH_RESULT_JSON, SEARCH_RESULT_JSON, SINGLE_VIDEO_JSON};
use crate::common::mocks::MockInfoExtractor;
use crate::test_utils;

fn entry(title: Option<&str>, url: Option<&str>) -> ExtractedInfo {
    ExtractedInfo {
        title: title.map(String::from),
        url: url.map(String::from),
        ..Default::default()
    }
}

#[test_case("https://example.com/track" ; "https link")]
#[test_case("http://example.com/track" ; "http link")]
#[test_case("HTTPS://WWW.YOUTUBE.COM/watch?v=abc" ; "uppercase scheme")]
#[test_case("HtTp://youtu.be/abc" ; "mixed case scheme")]
fn test_links_are_passed_through(query: &str) {
    assert!(is_url(query));
    assert_eq!(search_term(query), Cow::Borrowed(query));
}

#[test_case("lofi beats" ; "plain words")]
#[test_case("www.youtube.com/watch?v=abc" ; "link without scheme")]
#[test_case("ftp://example.com/track" ; "other scheme")]
#[test_case("listen to https://example.com" ; "link not at start")]
fn test_everything_else_is_searched(query: &str) {
    assert!(!is_url(query));
    assert_eq!(search_term(query), format!("{SEARCH_PREFIX}{query}"));
}

#[test]
fn test_search_prefix_is_applied_once() {
    let term = search_term("lofi beats");
    assert_eq!(term, "ytsearch:lofi beats");
    assert_eq!(term.matches(SEARCH_PREFIX).count(), 1);
}

#[test]
fn test_first_entry_picks_index_zero() {
    let info = ExtractedInfo {
        entries: Some(vec![
            entry(Some("first"), Some("https://cdn/1")),
            entry(Some("second"), Some("https://cdn/2")),
            entry(Some("third"), Some("https://cdn/3")),
        ]),
        ..Default::default()
    };

    let chosen = first_entry(Some(info)).unwrap();
    assert_eq!(chosen.title.as_deref(), Some("first"));
}

#[test]
fn test_first_entry_keeps_single_result() {
    let info = entry(Some("only"), Some("https://cdn/only"));
    assert_eq!(first_entry(Some(info.clone())).unwrap(), info);
}

#[test]
fn test_first_entry_without_information() {
    assert_matches!(first_entry(None), Err(ResolveError::NoInformation));

    let empty = ExtractedInfo {
        entries: Some(vec![]),
        ..Default::default()
    };
    assert_matches!(first_entry(Some(empty)), Err(ResolveError::NoInformation));
}

#[test]
fn test_resolved_track_falls_back_to_query_title() {
    let track = ResolvedTrack::from_entry(entry(None, Some("https://cdn/x")), "my query").unwrap();
    assert_eq!(track.title, "my query");

    let track =
        ResolvedTrack::from_entry(entry(Some("  "), Some("https://cdn/x")), "my query").unwrap();
    assert_eq!(track.title, "my query");
}

#[test]
fn test_resolved_track_needs_stream_url() {
    assert_matches!(
        ResolvedTrack::from_entry(entry(Some("title"), None), "q"),
        Err(ResolveError::MissingStreamUrl)
    );
}

#[test]
fn test_parse_single_video() {
    let info = ExtractedInfo::parse(SINGLE_VIDEO_JSON.as_bytes()).unwrap().unwrap();

    assert_eq!(info.title.as_deref(), Some("Never Gonna Give You Up"));
    assert_eq!(
        info.url.as_deref(),
        Some("https://rr1---sn.googlevideo.com/videoplayback?id=1")
    );
    assert!(info.entries.is_none());
}

#[test]
fn test_parse_search_result() {
    let info = ExtractedInfo::parse(SEARCH_RESULT_JSON.as_bytes()).unwrap().unwrap();
    let entries = info.entries.unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].title.as_deref(), Some("lofi hip hop radio"));
}

#[test_case(b"" ; "empty output")]
#[test_case(b"  \n" ; "whitespace only")]
#[test_case(b"null" ; "json null")]
fn test_parse_nothing(stdout: &[u8]) {
    assert_matches!(ExtractedInfo::parse(stdout), Ok(None));
}

#[test]
fn test_parse_garbage() {
    assert_matches!(
        ExtractedInfo::parse(b"ERROR: not json"),
        Err(ResolveError::Parse(_))
    );
}

#[test]
fn test_ytdlp_args_end_with_search_term() {
    let args = YtDlp::args("ytsearch:lofi beats");

    assert!(args.contains(&"-J".to_string()));
    assert!(args.contains(&"--no-playlist".to_string()));
    assert_eq!(args.last().map(String::as_str), Some("ytsearch:lofi beats"));
}

#[tokio::test]
async fn test_resolve_searches_plain_text() {
    test_utils::init();
    let mut extractor = MockInfoExtractor::new();
    extractor
        .expect_extract_info()
        .withf(|term| term == "ytsearch:lofi beats")
        .times(1)
        .returning(|_| Ok(ExtractedInfo::parse(SEARCH_RESULT_JSON.as_bytes()).unwrap()));

    let resolver = AudioResolver::new(extractor);
    let track = resolver.resolve("lofi beats").await.unwrap();

    assert_eq!(
        track,
        ResolvedTrack {
            title: "lofi hip hop radio".to_string(),
            stream_url: "https://rr2---sn.googlevideo.com/videoplayback?id=2".to_string(),
        }
    );
}

#[tokio::test]
async fn test_resolve_passes_links_through() {
    let mut extractor = MockInfoExtractor::new();
    extractor
        .expect_extract_info()
        .withf(|term| term == "https://example.com/track")
        .times(1)
        .returning(|_| Ok(Some(entry(Some("Example Track"), Some("https://cdn/track")))));

    let resolver = AudioResolver::new(extractor);
    let track = resolver.resolve("https://example.com/track").await.unwrap();

    assert_eq!(track.title, "Example Track");
    assert_eq!(track.stream_url, "https://cdn/track");
}

#[tokio::test]
async fn test_resolve_empty_search() {
    let mut extractor = MockInfoExtractor::new();
    extractor
        .expect_extract_info()
        .times(1)
        .returning(|_| Ok(ExtractedInfo::parse(EMPTY_SEARCH_RESULT_JSON.as_bytes()).unwrap()));

    let resolver = AudioResolver::new(extractor);
    assert_matches!(
        resolver.resolve("nothing").await,
        Err(ResolveError::NoInformation)
    );
}

#[tokio::test]
async fn test_resolve_keeps_extraction_errors_apart() {
    let mut extractor = MockInfoExtractor::new();
    extractor
        .expect_extract_info()
        .returning(|_| Err(ResolveError::Extraction("ERROR: Video unavailable".into())));

    let resolver = AudioResolver::new(extractor);
    let err = resolver.resolve("https://youtu.be/gone").await.unwrap_err();

    assert!(err.is_extraction());
    assert!(!ResolveError::NoInformation.is_extraction());
}

#[tokio::test]
async fn test_missing_ytdlp_is_not_an_extraction_error() {
    let resolver = AudioResolver::new(YtDlp::new("/nonexistent/tunebot/yt-dlp"));
    let err = resolver.resolve("lofi beats").await.unwrap_err();

    assert_matches!(err, ResolveError::Io(_));
    assert!(!err.is_extraction());
}
