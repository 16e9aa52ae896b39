//! End-to-end timeline production scenarios.

use std::fs;
use std::path::Path;

use rva_core::analysis::{detect_beats, BeatKind};
use rva_core::captions::{CaptionEntry, CaptionTrack};
use rva_core::catalog::{normalize_catalog, CatalogManifest, MediaRef, NoProbe};
use rva_core::config::Settings;
use rva_core::models::{AssetCatalog, AssetKind, AssetRecord, DuckingCurve, TransitionHint};
use rva_core::script::parse_script;
use rva_core::strategy::StrategyConfig;
use rva_core::timeline::{DuckingEnvelope, LayerKind, SkipReason, TimelineBuilder};
use rva_core::validation::{check_non_overlap, TimelineValidator};
use rva_core::{produce_timeline, Layer, Timeline, TimelinePlan, TimelineRequest, TrackKind};
use tempfile::tempdir;

const TOL: f64 = 1e-9;

fn settings() -> Settings {
    let mut settings = Settings::default();
    settings.strategy.adapt_to_assets = false;
    settings
}

fn base_catalog(narration_len: f64) -> AssetCatalog {
    AssetCatalog {
        narration: Some(
            AssetRecord::new(AssetKind::Narration, "/run/voice.mp3").with_duration(narration_len),
        ),
        background: Some(AssetRecord::new(AssetKind::Background, "/run/bg.mp4").with_duration(60.0)),
        ..Default::default()
    }
}

fn produce(script: &str, captions: Vec<CaptionEntry>, catalog: AssetCatalog, settings: Settings) -> TimelinePlan {
    produce_timeline(
        TimelineRequest::new(script, catalog)
            .with_captions(CaptionTrack::new(captions))
            .with_settings(settings),
    )
    .unwrap()
}

fn two_second_lines(count: usize) -> Vec<CaptionEntry> {
    (0..count)
        .map(|i| {
            let start = i as f64 * 2.0;
            CaptionEntry::new(i + 1, start, start + 2.0, format!("Line {:02}.", i + 1))
        })
        .collect()
}

fn spoken_text(captions: &[CaptionEntry]) -> String {
    captions
        .iter()
        .map(|c| c.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

#[test]
fn script_without_breaks_becomes_one_narration_layer() {
    let captions = two_second_lines(10);
    // The trailing sentence pushes the 80% coverage point onto entry 10.
    let script = format!("{} That is all folks.", spoken_text(&captions));

    let plan = produce(&script, captions.clone(), base_catalog(20.0), settings());
    let timeline = &plan.timeline;

    let narration = timeline.track(TrackKind::NarrationAudio);
    assert_eq!(narration.len(), 1);
    assert!(narration[0].timeline_start.abs() < TOL);
    assert!((narration[0].timeline_end - 20.0).abs() < TOL);
    assert!((timeline.total_duration - 20.0).abs() < TOL);
    assert_eq!(timeline.track(TrackKind::Captions).len(), 10);

    // Single window at tempo 1.0: captions keep their times.
    for (i, layer) in timeline.track(TrackKind::Captions).iter().enumerate() {
        assert!((layer.timeline_start - i as f64 * 2.0).abs() < TOL);
        assert!((layer.timeline_end - (i as f64 * 2.0 + 2.0)).abs() < TOL);
    }

    // Script text identical to the captions: 71 of 89 chars after entry 8,
    // 80 after entry 9, so the estimate closes at 18s.
    let exact = produce(&spoken_text(&captions), captions, base_catalog(20.0), settings());
    let narration = exact.timeline.track(TrackKind::NarrationAudio);
    assert_eq!(narration.len(), 1);
    assert!((narration[0].timeline_end - 18.0).abs() < TOL);
    assert!((exact.timeline.total_duration - 18.0).abs() < TOL);
    assert_eq!(exact.timeline.track(TrackKind::Captions).len(), 9);
}

#[test]
fn unset_strategy_keeps_caption_derived_duration() {
    let captions = two_second_lines(10);
    let script = format!("{} That is all folks.", spoken_text(&captions));

    let plan = produce_timeline(
        TimelineRequest::new(script.as_str(), base_catalog(20.0))
            .with_captions(CaptionTrack::new(captions.clone())),
    )
    .unwrap();
    assert_eq!(plan.strategy.name, "default");
    assert!((plan.strategy.tempo - 1.0).abs() < TOL);
    let narration = plan.timeline.track(TrackKind::NarrationAudio);
    assert!((narration[0].timeline_end - 20.0).abs() < TOL);
    assert!((plan.timeline.total_duration - 20.0).abs() < TOL);

    let parsed = parse_script(&script);
    let catalog = base_catalog(20.0);
    let strategy = StrategyConfig::default();
    let timeline = TimelineBuilder::new(&parsed.segments, &catalog, &strategy)
        .with_captions(&captions)
        .build()
        .unwrap();
    assert!((timeline.total_duration - 20.0).abs() < TOL);
}

#[test]
fn video_break_overlaps_following_narration() {
    let captions = vec![
        CaptionEntry::new(1, 0.0, 1.0, "A."),
        CaptionEntry::new(2, 1.0, 2.0, "B!"),
        CaptionEntry::new(3, 2.0, 8.0, "C."),
    ];
    let mut catalog = base_catalog(8.0);
    catalog.clips.push(
        AssetRecord::new(AssetKind::Clip, "/run/clips/action.mp4")
            .with_tag("action")
            .with_duration(10.0),
    );

    let plan = produce(
        "A. B! [VIDEO_BREAK: duration=10s, clip=action] C.",
        captions,
        catalog,
        settings(),
    );

    let kinds: Vec<String> = plan.segments.iter().map(|s| s.kind.to_string()).collect();
    assert_eq!(kinds, ["narration", "attention_cue", "video_break", "narration"]);

    let timeline = &plan.timeline;
    let clip = &timeline.track(TrackKind::ClipVideo)[0];
    let t = clip.timeline_start;
    assert!((t - 2.0).abs() < TOL);
    assert!((clip.timeline_end - (t + 10.0)).abs() < TOL);

    let narration = timeline.track(TrackKind::NarrationAudio);
    assert!((narration[2].timeline_start - (t + 5.0)).abs() < TOL);
    assert!((narration[2].source_start - 2.0).abs() < TOL);

    let envelope = timeline.track(TrackKind::ClipAudio)[0]
        .ducking
        .expect("clip audio is ducked");
    assert!((envelope.start - (t + 5.0)).abs() < TOL);
    assert!((envelope.end - (t + 10.0)).abs() < TOL);
    assert!(check_non_overlap(timeline).is_ok());
}

#[test]
fn script_of_only_breaks_still_yields_a_timeline() {
    let mut catalog = base_catalog(20.0);
    catalog.clips.push(
        AssetRecord::new(AssetKind::Clip, "/run/clips/action.mp4")
            .with_tag("action")
            .with_duration(10.0),
    );

    let plan = produce("[VIDEO_BREAK: duration=10s, clip=action]", Vec::new(), catalog, settings());
    let timeline = &plan.timeline;

    assert!(timeline.track(TrackKind::NarrationAudio).is_empty());
    let clips = timeline.track(TrackKind::ClipVideo);
    assert_eq!(clips.len(), 1);
    assert!(clips[0].timeline_start.abs() < TOL);
    assert!(clips[0].timeline_end <= timeline.total_duration + TOL);
    assert!(timeline.total_duration > 0.0);

    assert_eq!(plan.stages.stages_skipped, ["PlaceAssets"]);
    assert_eq!(plan.stages.stages_completed, ["ValidateTimeline"]);
    assert!(plan.placement.is_none());
}

#[test]
fn pause_longer_than_half_a_second_is_a_full_strength_beat() {
    let entries = vec![
        CaptionEntry::new(1, 0.0, 1.0, "and then"),
        CaptionEntry::new(2, 1.6, 2.5, "it happened"),
    ];
    let beats = detect_beats(&entries);
    assert_eq!(beats.len(), 1);
    assert_eq!(beats[0].kind, BeatKind::Pause);
    assert!((beats[0].time - 1.0).abs() < TOL);
    assert!((beats[0].strength - 1.0).abs() < TOL);
}

#[test]
fn validator_trims_overlapping_overlays() {
    let mut timeline = Timeline::new();
    timeline.total_duration = 20.0;
    timeline.push(Layer::new(TrackKind::OverlayImages, LayerKind::Image, 5.0, 8.0, "first"));
    timeline.push(Layer::new(TrackKind::OverlayImages, LayerKind::Image, 6.0, 9.0, "second"));

    let validator = TimelineValidator::default();
    validator.validate(&mut timeline);

    let overlays = timeline.track(TrackKind::OverlayImages);
    assert_eq!(overlays.len(), 2);
    assert!((overlays[1].timeline_start - 8.0).abs() < TOL);
    assert!((overlays[1].timeline_end - 9.0).abs() < TOL);

    let before = timeline.clone();
    let report = validator.validate(&mut timeline);
    assert!(report.is_clean());
    assert_eq!(timeline, before);
}

fn touch(dir: &Path, name: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, b"").unwrap();
    path
}

#[test]
fn missing_clip_file_skips_the_break() {
    let dir = tempdir().unwrap();
    let manifest = CatalogManifest {
        narration: Some(MediaRef::Detailed {
            path: touch(dir.path(), "voice.mp3"),
            duration: Some(30.0),
            description: None,
        }),
        background: Some(MediaRef::Path(touch(dir.path(), "bg.mp4"))),
        clips: [("action".to_string(), MediaRef::Path(dir.path().join("action.mp4")))]
            .into_iter()
            .collect(),
        ..Default::default()
    };
    let normalized = normalize_catalog(&manifest, &["action".to_string()], &NoProbe);
    assert!(normalized
        .report
        .issues
        .iter()
        .any(|i| i.contains("action")));

    let plan = produce_timeline(
        TimelineRequest::new(
            "Halo semua. [VIDEO_BREAK: duration=8s, clip=action] Lanjut lagi.",
            normalized.catalog,
        )
        .with_settings(settings())
        .with_catalog_issues(normalized.report.issues),
    )
    .unwrap();
    let timeline = &plan.timeline;

    assert!(timeline.track(TrackKind::ClipVideo).is_empty());
    assert!(timeline.track(TrackKind::ClipAudio).is_empty());
    assert!(timeline.has_trace(|r| matches!(
        r,
        SkipReason::ClipUnavailable { break_type, .. } if break_type == "action"
    )));

    // The cursor did not move across the skipped break.
    let narration = timeline.track(TrackKind::NarrationAudio);
    assert_eq!(narration.len(), 2);
    assert!((narration[1].timeline_start - narration[0].timeline_end).abs() < TOL);
    assert!((timeline.total_duration - narration[1].timeline_end).abs() < TOL);
}

#[test]
fn keyword_overlay_follows_the_spoken_word() {
    let captions = vec![
        CaptionEntry::new(1, 0.0, 3.0, "Wow ini cerita"),
        CaptionEntry::new(2, 3.0, 12.3, "yang sangat"),
        CaptionEntry::new(3, 12.3, 13.0, "gila."),
        CaptionEntry::new(4, 13.0, 20.0, "Dan itu belum semuanya kawan."),
    ];
    let mut catalog = base_catalog(20.0);
    catalog.images = vec![
        AssetRecord::new(AssetKind::Image, "/run/images/shock_face.png"),
        AssetRecord::new(AssetKind::Image, "/run/images/wow_face.png"),
    ];
    let mut settings = settings();
    settings.placement.beat_sync = false;

    let plan = produce(
        "Wow ini cerita yang sangat gila. Dan itu belum semuanya kawan.",
        captions,
        catalog,
        settings,
    );
    let timeline = &plan.timeline;
    assert!((timeline.total_duration - 20.0).abs() < TOL);

    let overlays = timeline.track(TrackKind::OverlayImages);
    let gila = overlays
        .iter()
        .find(|l| (l.timeline_start - 11.8).abs() < TOL)
        .expect("overlay for 'gila'");
    assert!((gila.timeline_end - 15.8).abs() < TOL);
    assert_eq!(gila.transition, Some(TransitionHint::Spin));

    // "Wow" is spoken at 0.0 but lands after the intro window.
    assert!(overlays.iter().all(|l| l.timeline_start >= 5.0 - TOL));
    assert!(overlays.iter().any(|l| (l.timeline_start - 5.0).abs() < TOL));
}

#[test]
fn narration_accounts_for_total_duration() {
    let mut catalog = base_catalog(30.0);
    catalog.clips.push(
        AssetRecord::new(AssetKind::Clip, "/run/clips/fight.mp4")
            .with_tag("fight")
            .with_duration(25.0),
    );
    let parsed = parse_script(
        "Pertama kita mulai. [VIDEO_BREAK: duration=4-6s, clip=fight] Lalu ini terjadi! \
         Semua kaget. [VIDEO_BREAK: duration=30s, clip=fight] Selesai sudah.",
    );
    let strategy = StrategyConfig::default().with_tempo(1.25);
    let timeline = TimelineBuilder::new(&parsed.segments, &catalog, &strategy)
        .build()
        .unwrap();

    let narration: f64 = timeline
        .track(TrackKind::NarrationAudio)
        .iter()
        .map(Layer::duration)
        .sum();
    // Net advance of a break is its clip length minus the ducked overlap.
    let net_breaks: f64 = timeline
        .track(TrackKind::ClipAudio)
        .iter()
        .map(|l| l.duration() - l.ducking.map(|d| d.window()).unwrap_or(0.0))
        .sum();
    assert_eq!(timeline.track(TrackKind::ClipAudio).len(), 2);
    assert!((narration - (timeline.total_duration - net_breaks)).abs() < 1e-6);

    // Cursor never moves backwards across segments.
    let mut starts: Vec<(usize, f64)> = timeline
        .layers()
        .filter(|l| l.track == TrackKind::NarrationAudio || l.track == TrackKind::ClipVideo)
        .filter_map(|l| l.segment.map(|s| (s, l.timeline_start)))
        .collect();
    starts.sort_by_key(|(segment, _)| *segment);
    assert!(starts.windows(2).all(|w| w[0].1 <= w[1].1 + TOL));
}

#[test]
fn ducking_envelope_boundaries_hold_for_every_curve() {
    for curve in DuckingCurve::ALL {
        let envelope = DuckingEnvelope {
            start: 4.0,
            end: 9.0,
            target_volume: 0.3,
            fade_duration: 0.5,
            curve,
            base_volume: 0.9,
        };
        assert_eq!(envelope.gain_at(3.99), 1.0, "{curve}");
        assert_eq!(envelope.gain_at(9.0), 1.0, "{curve}");
        assert!((envelope.gain_at(6.5) - 0.3).abs() < TOL, "{curve}");
    }
}
