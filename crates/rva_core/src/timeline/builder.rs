//! Timeline builder.
//!
//! A strict left-to-right fold over script segments carrying two cursors:
//! `current_time` in output-timeline seconds and `audio_position` inside the
//! narration audio source. Narration advances both; a video break advances
//! only the output cursor, by the clip length minus its overlap, so the next
//! narration resumes over the clip's tail from the same audio position.

use super::ducking::DuckingEnvelope;
use super::duration::{estimate_duration, EstimateSource};
use super::error::BuildError;
use super::overlap::overlap_for;
use super::retime::SourceTimeMap;
use super::trace::SkipReason;
use super::transitions::plan_transitions;
use super::types::{Layer, LayerKind, Timeline, TimelineMetadata, TrackKind};
use crate::captions::{CaptionEntry, CaptionTrack};
use crate::models::{AssetCatalog, AssetRecord, Segment, SegmentKind};
use crate::script::check_well_formed;
use crate::strategy::StrategyConfig;

/// Trace stage name for entries recorded by the builder.
pub const STAGE: &str = "build";

/// Effect applied to the background behind regular narration.
pub const BACKGROUND_DARKEN: &str = "darken_0.6";

/// Remaining audio below this is treated as used up.
const AUDIO_EPS: f64 = 1e-6;

/// Output and audio cursors of the fold.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Cursor {
    current_time: f64,
    audio_position: f64,
}

/// Builds the base timeline (narration, background, clips, captions).
///
/// # Example
///
/// ```ignore
/// let timeline = TimelineBuilder::new(&parsed.segments, &catalog, &strategy)
///     .with_captions(&captions.entries)
///     .build()?;
/// ```
pub struct TimelineBuilder<'a> {
    segments: &'a [Segment],
    catalog: &'a AssetCatalog,
    strategy: &'a StrategyConfig,
    captions: &'a [CaptionEntry],
}

impl<'a> TimelineBuilder<'a> {
    pub fn new(
        segments: &'a [Segment],
        catalog: &'a AssetCatalog,
        strategy: &'a StrategyConfig,
    ) -> Self {
        Self {
            segments,
            catalog,
            strategy,
            captions: &[],
        }
    }

    /// Caption entries in narration-audio time. Without captions every
    /// narration duration falls back to the word-count estimate.
    pub fn with_captions(mut self, captions: &'a [CaptionEntry]) -> Self {
        self.captions = captions;
        self
    }

    /// Run the fold.
    ///
    /// Fails only when there is no narration basis or a segment is
    /// malformed; every other problem is recorded on `Timeline::trace`.
    pub fn build(&self) -> Result<Timeline, BuildError> {
        let narration = self
            .catalog
            .narration
            .as_ref()
            .filter(|n| n.available)
            .ok_or(BuildError::MissingNarration)?;
        let audio_len = narration
            .duration
            .filter(|d| *d > 0.0)
            .ok_or(BuildError::NoNarrationDuration)?;

        let mut ordered: Vec<&Segment> = self.segments.iter().collect();
        ordered.sort_by_key(|s| s.order);
        for segment in &ordered {
            check_well_formed(segment)
                .map_err(|reason| BuildError::malformed(segment.order, reason))?;
        }

        let mut timeline = Timeline::new();
        timeline.metadata = TimelineMetadata {
            strategy: self.strategy.name.clone(),
            segment_count: ordered.len(),
            narration_duration: audio_len,
            ..Default::default()
        };

        let mut captions = CaptionTrack::new(self.captions.to_vec());
        let affected = captions.truncate_to(audio_len);
        if affected > 0 {
            timeline.record(
                STAGE,
                SkipReason::CaptionsTruncated {
                    affected,
                    audio_length: audio_len,
                },
            );
        }

        let mut fold = Fold {
            timeline,
            cursor: Cursor::default(),
            audio_len,
            narration,
            background: self.catalog.available_background(),
            background_reported: false,
            captions: &captions.entries,
            catalog: self.catalog,
            strategy: self.strategy,
        };

        for segment in ordered {
            let before = fold.cursor;
            match segment.kind {
                SegmentKind::Narration | SegmentKind::AttentionCue => fold.spoken(segment),
                SegmentKind::VideoBreak => fold.video_break(segment),
            }
            debug_assert!(fold.cursor.current_time >= before.current_time);
        }

        let Fold {
            mut timeline,
            cursor,
            ..
        } = fold;

        timeline.total_duration = cursor.current_time;
        retime_captions(&mut timeline, &captions.entries);
        timeline.transitions = plan_transitions(&timeline, self.strategy.transition_style);
        timeline.refresh_layer_count();

        tracing::debug!(
            "Built base timeline: {:.2}s, {} layers, audio used {:.2}/{:.2}s",
            timeline.total_duration,
            timeline.metadata.layer_count,
            cursor.audio_position,
            audio_len
        );

        Ok(timeline)
    }
}

/// Mutable state threaded through the fold.
struct Fold<'b> {
    timeline: Timeline,
    cursor: Cursor,
    audio_len: f64,
    narration: &'b AssetRecord,
    background: Option<&'b AssetRecord>,
    background_reported: bool,
    captions: &'b [CaptionEntry],
    catalog: &'b AssetCatalog,
    strategy: &'b StrategyConfig,
}

impl Fold<'_> {
    fn spoken(&mut self, segment: &Segment) {
        let order = segment.order;
        let position = self.cursor.audio_position;
        let remaining = self.audio_len - position;

        if remaining <= AUDIO_EPS {
            self.timeline
                .record(STAGE, SkipReason::NarrationExhausted { segment: order });
            return;
        }

        let estimate = estimate_duration(segment.text(), self.captions, position);
        let mut duration = estimate.seconds;
        if duration > remaining {
            self.timeline.record(
                STAGE,
                SkipReason::NarrationClamped {
                    segment: order,
                    requested: duration,
                    granted: remaining,
                },
            );
            duration = remaining;
        }

        let tempo = if self.strategy.tempo > 0.0 {
            self.strategy.tempo
        } else {
            1.0
        };
        let actual = duration / tempo;
        let start = self.cursor.current_time;
        let end = start + actual;

        let basis = match estimate.source {
            EstimateSource::Captions => "captions",
            EstimateSource::WordCount => "word count",
        };
        self.timeline.push(
            Layer::new(
                TrackKind::NarrationAudio,
                LayerKind::NarrationAudio,
                start,
                end,
                format!("{} segment {} ({})", segment.kind, order, basis),
            )
            .with_asset(self.narration.asset_ref())
            .with_source(position, position + duration)
            .with_speed(tempo)
            .with_volume(1.0)
            .with_segment(order),
        );

        match self.background {
            Some(background) => {
                let mut layer = Layer::new(
                    TrackKind::BackgroundVideo,
                    LayerKind::BackgroundVideo,
                    start,
                    end,
                    format!("background for segment {}", order),
                )
                .with_asset(background.asset_ref())
                .with_segment(order)
                .looped();
                if segment.kind != SegmentKind::AttentionCue {
                    layer = layer.with_effect(BACKGROUND_DARKEN);
                }
                self.timeline.push(layer);
            }
            None if !self.background_reported => {
                self.timeline.record(STAGE, SkipReason::MissingBackground);
                self.background_reported = true;
            }
            None => {}
        }

        self.cursor.current_time = end;
        self.cursor.audio_position = position + duration;
    }

    fn video_break(&mut self, segment: &Segment) {
        let order = segment.order;
        let requested = segment.duration.unwrap_or(0.0);
        let break_type = segment.break_type.as_deref().unwrap_or_default();

        if requested <= 0.0 {
            self.timeline
                .record(STAGE, SkipReason::EmptyBreak { segment: order });
            return;
        }

        let Some(clip) = self.catalog.resolve_clip(break_type) else {
            self.timeline.record(
                STAGE,
                SkipReason::ClipUnavailable {
                    segment: order,
                    break_type: break_type.to_string(),
                },
            );
            return;
        };
        if clip.tag.as_deref() != Some(break_type) {
            tracing::info!(
                "No clip tagged '{}', using fallback {}",
                break_type,
                clip.path.display()
            );
        }

        let duration = clip
            .duration
            .filter(|d| *d > 0.0)
            .map_or(requested, |d| requested.min(d));
        let overlap = overlap_for(duration, self.strategy.overlap_percentage);
        let start = self.cursor.current_time;
        let end = start + duration;
        let asset_ref = clip.asset_ref();

        self.timeline.push(
            Layer::new(
                TrackKind::ClipVideo,
                LayerKind::ClipVideo,
                start,
                end,
                format!(
                    "video break '{}' ({:.1}s, overlap {:.1}s)",
                    break_type, duration, overlap
                ),
            )
            .with_asset(asset_ref.clone())
            .with_segment(order),
        );

        let base_volume = self.strategy.clip_base_volume();
        let mut audio = Layer::new(
            TrackKind::ClipAudio,
            LayerKind::ClipAudio,
            start,
            end,
            format!("audio of video break '{}'", break_type),
        )
        .with_asset(asset_ref)
        .with_volume(base_volume)
        .with_segment(order);
        if self.strategy.ducking_enabled && overlap > 0.0 {
            audio = audio.with_ducking(DuckingEnvelope {
                start: end - overlap,
                end,
                target_volume: self.strategy.duck_target_volume,
                fade_duration: self.strategy.duck_fade_duration,
                curve: self.strategy.ducking_curve,
                base_volume,
            });
        }
        self.timeline.push(audio);

        self.cursor.current_time += duration - overlap;
    }
}

/// Emit one caption layer per entry that falls inside a narration window.
fn retime_captions(timeline: &mut Timeline, captions: &[CaptionEntry]) {
    let map = SourceTimeMap::from_timeline(timeline);

    for entry in captions {
        match map.map_span(entry.start, entry.end) {
            Some((start, end)) if end > start => timeline.push(
                Layer::new(
                    TrackKind::Captions,
                    LayerKind::Caption,
                    start,
                    end,
                    format!("caption {}", entry.index),
                )
                .with_text(entry.text.clone())
                .with_source(entry.start, entry.end),
            ),
            _ => timeline.record(STAGE, SkipReason::CaptionUnmapped { index: entry.index }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AssetKind;
    use crate::script::parse_script;

    const TOL: f64 = 1e-9;

    fn catalog(narration_len: f64) -> AssetCatalog {
        AssetCatalog {
            narration: Some(
                AssetRecord::new(AssetKind::Narration, "/run/voice.mp3").with_duration(narration_len),
            ),
            background: Some(
                AssetRecord::new(AssetKind::Background, "/run/bg.mp4").with_duration(60.0),
            ),
            clips: vec![AssetRecord::new(AssetKind::Clip, "/run/clips/action.mp4")
                .with_tag("action")
                .with_duration(10.0)],
            ..Default::default()
        }
    }

    fn strategy() -> StrategyConfig {
        StrategyConfig::default().with_tempo(1.0)
    }

    fn build(script: &str, catalog: &AssetCatalog, strategy: &StrategyConfig) -> Timeline {
        let parsed = parse_script(script);
        TimelineBuilder::new(&parsed.segments, catalog, strategy)
            .build()
            .unwrap()
    }

    #[test]
    fn missing_narration_is_fatal() {
        let mut catalog = catalog(30.0);
        catalog.narration = None;
        let segments = vec![Segment::narration(0, "Hello.")];
        let err = TimelineBuilder::new(&segments, &catalog, &strategy())
            .build()
            .unwrap_err();
        assert_eq!(err, BuildError::MissingNarration);
    }

    #[test]
    fn narration_without_duration_is_fatal() {
        let mut catalog = catalog(30.0);
        if let Some(n) = catalog.narration.as_mut() {
            n.duration = None;
        }
        let segments = vec![Segment::narration(0, "Hello.")];
        let err = TimelineBuilder::new(&segments, &catalog, &strategy())
            .build()
            .unwrap_err();
        assert_eq!(err, BuildError::NoNarrationDuration);
    }

    #[test]
    fn malformed_segment_is_fatal() {
        let catalog = catalog(30.0);
        let mut broken = Segment::video_break(1, 5.0, "action");
        broken.break_type = None;
        let segments = vec![Segment::narration(0, "Hello."), broken];
        let err = TimelineBuilder::new(&segments, &catalog, &strategy())
            .build()
            .unwrap_err();
        assert!(matches!(err, BuildError::MalformedSegment { order: 1, .. }));
    }

    #[test]
    fn break_overlaps_following_narration() {
        let catalog = catalog(30.0);
        let timeline = build(
            "A. B! [VIDEO_BREAK: duration=10s, clip=action] C.",
            &catalog,
            &strategy(),
        );

        let narration = timeline.track(TrackKind::NarrationAudio);
        assert_eq!(narration.len(), 3);
        // One word at 150 wpm.
        assert!((narration[0].duration() - 0.4).abs() < TOL);

        let clips = timeline.track(TrackKind::ClipVideo);
        assert_eq!(clips.len(), 1);
        let t = clips[0].timeline_start;
        assert!((t - 0.8).abs() < TOL);
        assert!((clips[0].timeline_end - (t + 10.0)).abs() < TOL);
        assert_eq!(clips[0].z_index, 10);

        // 10s clip falls in the 50% bucket.
        assert!((narration[2].timeline_start - (t + 5.0)).abs() < TOL);
        // Audio resumes where the attention cue left off.
        assert!((narration[2].source_start - narration[1].source_end).abs() < TOL);
    }

    #[test]
    fn clip_audio_ducks_over_the_overlap() {
        let catalog = catalog(30.0);
        let timeline = build(
            "A. B! [VIDEO_BREAK: duration=10s, clip=action] C.",
            &catalog,
            &strategy(),
        );

        let audio = &timeline.track(TrackKind::ClipAudio)[0];
        assert_eq!(audio.volume, Some(0.9));
        let envelope = audio.ducking.expect("ducking envelope");
        assert!((envelope.end - audio.timeline_end).abs() < TOL);
        assert!((envelope.window() - 5.0).abs() < TOL);
        assert!((envelope.target_volume - 0.3).abs() < TOL);
    }

    #[test]
    fn no_ducking_keeps_full_volume() {
        let catalog = catalog(30.0);
        let strategy = strategy().with_ducking(false);
        let timeline = build(
            "A. B! [VIDEO_BREAK: duration=10s, clip=action] C.",
            &catalog,
            &strategy,
        );
        let audio = &timeline.track(TrackKind::ClipAudio)[0];
        assert_eq!(audio.volume, Some(1.0));
        assert!(audio.ducking.is_none());
    }

    #[test]
    fn clip_length_caps_break_duration() {
        let catalog = catalog(30.0);
        let timeline = build(
            "Go. Now! [VIDEO_BREAK: duration=30s, clip=action]",
            &catalog,
            &strategy(),
        );
        let clip = &timeline.track(TrackKind::ClipVideo)[0];
        assert!((clip.duration() - 10.0).abs() < TOL);
    }

    #[test]
    fn missing_clip_skips_break_without_moving_cursor() {
        let mut catalog = catalog(30.0);
        catalog.clips[0].available = false;
        let timeline = build(
            "A. B! [VIDEO_BREAK: duration=10s, clip=action] C.",
            &catalog,
            &strategy(),
        );

        assert!(timeline.track(TrackKind::ClipVideo).is_empty());
        let narration = timeline.track(TrackKind::NarrationAudio);
        assert!((narration[2].timeline_start - narration[1].timeline_end).abs() < TOL);
        assert!(timeline.has_trace(|r| matches!(
            r,
            SkipReason::ClipUnavailable { break_type, .. } if break_type == "action"
        )));
    }

    #[test]
    fn cursor_never_moves_backwards() {
        let catalog = catalog(120.0);
        let strategy = strategy().with_overlap_percentage(Some(1.0));
        let timeline = build(
            "One two. Three! [VIDEO_BREAK: duration=4s, clip=action] \
             [VIDEO_BREAK: duration=25s, clip=action] Four five six.",
            &catalog,
            &strategy,
        );

        let mut placed: Vec<&Layer> = timeline
            .layers()
            .filter(|l| matches!(l.track, TrackKind::NarrationAudio | TrackKind::ClipVideo))
            .collect();
        placed.sort_by_key(|l| l.segment);
        for pair in placed.windows(2) {
            assert!(pair[1].timeline_start >= pair[0].timeline_start);
        }
        assert!(timeline.total_duration >= 0.0);
    }

    #[test]
    fn narration_duration_is_conserved() {
        let catalog = catalog(120.0);
        let strategy = strategy().with_tempo(1.25);
        let timeline = build(
            "Alpha beta gamma. Delta! [VIDEO_BREAK: duration=12s, clip=action] \
             Epsilon zeta. Eta theta! [VIDEO_BREAK: duration=6s, clip=action] Iota.",
            &catalog,
            &strategy,
        );

        let narration: f64 = timeline
            .track(TrackKind::NarrationAudio)
            .iter()
            .map(Layer::duration)
            .sum();
        let breaks: f64 = timeline
            .track(TrackKind::ClipVideo)
            .iter()
            .map(|clip| clip.duration() - overlap_for(clip.duration(), None))
            .sum();
        assert!((narration - (timeline.total_duration - breaks)).abs() < 1e-6);
    }

    #[test]
    fn tempo_scales_output_but_not_source() {
        let catalog = catalog(30.0);
        let strategy = strategy().with_tempo(2.0);
        let timeline = build("One two three four five.", &catalog, &strategy);
        let layer = &timeline.track(TrackKind::NarrationAudio)[0];
        assert!((layer.source_end - layer.source_start - 2.0).abs() < TOL);
        assert!((layer.duration() - 1.0).abs() < TOL);
        assert_eq!(layer.speed, Some(2.0));
    }

    #[test]
    fn narration_is_clamped_to_audio_length() {
        let catalog = catalog(1.0);
        let timeline = build("One two three four five. Six seven.", &catalog, &strategy());
        let layer = &timeline.track(TrackKind::NarrationAudio)[0];
        assert!((layer.source_end - 1.0).abs() < TOL);
        assert!(timeline.has_trace(|r| matches!(r, SkipReason::NarrationClamped { .. })));
    }

    #[test]
    fn exhausted_audio_skips_later_narration() {
        let catalog = catalog(0.4);
        let timeline = build(
            "A. B! [VIDEO_BREAK: duration=4s, clip=action] C.",
            &catalog,
            &strategy(),
        );
        assert_eq!(timeline.track(TrackKind::NarrationAudio).len(), 1);
        assert!(timeline.has_trace(|r| matches!(r, SkipReason::NarrationExhausted { segment: 1 })));
    }

    #[test]
    fn background_follows_narration_and_darkens_only_narration() {
        let catalog = catalog(30.0);
        let timeline = build(
            "A. B! [VIDEO_BREAK: duration=10s, clip=action] C.",
            &catalog,
            &strategy(),
        );
        let background = timeline.track(TrackKind::BackgroundVideo);
        assert_eq!(background.len(), 3);
        assert!(background.iter().all(|l| l.looped && l.z_index == 0));
        assert_eq!(background[0].effects, vec![BACKGROUND_DARKEN.to_string()]);
        assert!(background[1].effects.is_empty());
    }

    #[test]
    fn missing_background_is_reported_once() {
        let mut catalog = catalog(30.0);
        catalog.background = None;
        let timeline = build("A. B! [VIDEO_BREAK: duration=10s, clip=action] C.", &catalog, &strategy());
        assert!(timeline.track(TrackKind::BackgroundVideo).is_empty());
        let count = timeline
            .trace
            .iter()
            .filter(|e| e.reason == SkipReason::MissingBackground)
            .count();
        assert_eq!(count, 1);
    }

    #[test]
    fn captions_retime_onto_single_window() {
        let catalog = catalog(4.0);
        let captions = vec![
            CaptionEntry::new(1, 0.0, 1.5, "Hello there"),
            CaptionEntry::new(2, 1.5, 4.0, "general kenobi."),
        ];
        let segments = vec![Segment::narration(0, "Hello there general kenobi.")];
        let strategy = strategy();
        let timeline = TimelineBuilder::new(&segments, &catalog, &strategy)
            .with_captions(&captions)
            .build()
            .unwrap();

        let layers = timeline.track(TrackKind::Captions);
        assert_eq!(layers.len(), 2);
        for (layer, entry) in layers.iter().zip(&captions) {
            assert!((layer.timeline_start - entry.start).abs() < TOL);
            assert!((layer.timeline_end - entry.end).abs() < TOL);
            assert_eq!(layer.z_index, 100);
            assert_eq!(layer.text.as_deref(), Some(entry.text.as_str()));
        }
        assert!((timeline.total_duration - 4.0).abs() < TOL);
    }

    #[test]
    fn captions_past_audio_are_truncated() {
        let catalog = catalog(3.0);
        let captions = vec![
            CaptionEntry::new(1, 0.0, 2.0, "First part"),
            CaptionEntry::new(2, 2.0, 3.5, "second part."),
            CaptionEntry::new(3, 3.5, 4.0, "ghost"),
        ];
        let segments = vec![Segment::narration(0, "First part second part.")];
        let strategy = strategy();
        let timeline = TimelineBuilder::new(&segments, &catalog, &strategy)
            .with_captions(&captions)
            .build()
            .unwrap();

        assert!(timeline.has_trace(|r| matches!(
            r,
            SkipReason::CaptionsTruncated { affected: 2, .. }
        )));
        let layers = timeline.track(TrackKind::Captions);
        assert_eq!(layers.len(), 2);
        assert!(layers.iter().all(|l| l.timeline_end <= 3.0 + TOL));
    }

    #[test]
    fn fading_strategy_plans_crossfade_into_clip() {
        let catalog = catalog(30.0);
        let timeline = build(
            "A. B! [VIDEO_BREAK: duration=10s, clip=action] C.",
            &catalog,
            &strategy(),
        );
        assert_eq!(timeline.transitions.len(), 1);
        assert_eq!(timeline.transitions[0].from_segment, Some(1));
        assert_eq!(timeline.transitions[0].to_segment, Some(2));
        assert_eq!(timeline.metadata.segment_count, 4);
        assert_eq!(timeline.metadata.layer_count, timeline.layer_count());
    }
}
