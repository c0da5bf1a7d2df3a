// Shared fixtures for integration tests and benchmarks
#![allow(dead_code)]

use stream_extract::tool_parser::SequentialIdGenerator;
use stream_extract::{ExtractionSnapshot, ExtractorConfig, StreamExtractor};

/// Tools an editor agent typically exposes
pub fn agent_config() -> ExtractorConfig {
    ExtractorConfig::builder()
        .reasoning_tags("<think>", "</think>")
        .tool("read_file", ["uri", "startLine", "endLine"])
        .tool("ls_dir", ["uri"])
        .tool("run_command", ["command", "cwd"])
        .tool("edit_file", ["uri", "changeDiff"])
        .build()
        .expect("valid test config")
}

/// Extractor with deterministic `call_N` ids
pub fn create_extractor(config: &ExtractorConfig) -> StreamExtractor {
    StreamExtractor::from_config(config)
        .expect("valid test config")
        .with_id_generator(Box::new(SequentialIdGenerator::default()))
}

/// Finalize the whole text in one call
pub fn extract_once(config: &ExtractorConfig, text: &str) -> ExtractionSnapshot {
    create_extractor(config)
        .finalize(text)
        .expect("single finalize succeeds")
}

/// Byte offsets of every char boundary in `text`, excluding 0
pub fn char_cuts(text: &str) -> Vec<usize> {
    text.char_indices()
        .map(|(i, c)| i + c.len_utf8())
        .collect()
}

/// Feed growing prefixes ending at `cuts`, then finalize with the whole text.
///
/// Also checks that display and reasoning text only ever grow.
pub fn extract_streaming(
    config: &ExtractorConfig,
    text: &str,
    cuts: &[usize],
) -> (Vec<ExtractionSnapshot>, ExtractionSnapshot) {
    let mut extractor = create_extractor(config);
    let mut snapshots: Vec<ExtractionSnapshot> = Vec::new();

    for &cut in cuts {
        let snapshot = extractor.update(&text[..cut]).expect("update succeeds");
        if let Some(previous) = snapshots.last() {
            assert!(
                snapshot.display_text.starts_with(&previous.display_text),
                "display shrank: {:?} -> {:?}",
                previous.display_text,
                snapshot.display_text
            );
            assert!(
                snapshot.reasoning_text.starts_with(&previous.reasoning_text),
                "reasoning shrank: {:?} -> {:?}",
                previous.reasoning_text,
                snapshot.reasoning_text
            );
        }
        snapshots.push(snapshot);
    }

    let last = extractor.finalize(text).expect("finalize succeeds");
    (snapshots, last)
}

/// Sample model outputs covering the tricky shapes
pub fn sample_outputs() -> Vec<&'static str> {
    vec![
        "plain answer with no markup at all",
        "<think>Let me check the file first.</think>Sure, reading it now.\n<read_file>\n<uri>/src/main.rs</uri>\n<startLine>1</startLine>\n<endLine>40</endLine>\n</read_file>\n",
        "<think>unterminated reasoning that never closes",
        "intro <think>a</think> middle <ls_dir><uri>/</uri></ls_dir> then <run_command>\n<command>\ncargo fmt --all\n</command>\n<cwd>/repo</cwd>\n</run_command> done",
        "<think>ship it</think><edit_file><uri>/a.ts</uri><changeDiff>\n- old\n+ new\n</changeDiff>",
        "a < b and c <read_x> is not a tool, nor is </think> here",
        "◁think▷ unicode around <ls_dir><uri>/ünï/cödé</uri></ls_dir> ✓",
        "<think>x</think><think>y</think> second think is display",
    ]
}
