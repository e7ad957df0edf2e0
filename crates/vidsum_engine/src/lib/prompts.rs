//! Prompt construction for the two generation phases.

use vidsum_datastore::SummaryMode;

use crate::chunker::Chunk;

/// Separator placed between per-chunk summaries before the combining pass.
pub const SECTION_SEPARATOR: &str = "\n\n---\n\n";

/// Prompt for one transcript chunk. Chunk summaries are intermediate
/// material; they stay factual and dense so the combining pass has
/// something to work with.
pub fn chunk_prompt(chunk: &Chunk, total_chunks: usize, language: &str) -> String {
    format!(
        "The text below is part {part} of {total} of a video transcript. \
         Summarize the key points of this part in {language}. \
         Keep concrete facts, names and numbers; do not editorialize.\n\n{text}",
        part = chunk.index + 1,
        total = total_chunks,
        language = language,
        text = chunk.text,
    )
}

/// Prompt for the final combining pass over the joined chunk summaries.
pub fn combine_prompt(combined: &str, language: &str, mode: SummaryMode) -> String {
    format!(
        "Below are section summaries of a single video, separated by `---`. \
         Merge them into one coherent summary in {language}, removing \
         repetition from overlapping sections.\n\n{instruction}\n\n{combined}",
        language = language,
        instruction = mode_instruction(mode),
        combined = combined,
    )
}

fn mode_instruction(mode: SummaryMode) -> &'static str {
    match mode {
        SummaryMode::Brief => "Write 3-5 sentences covering only the core message of the video.",
        SummaryMode::Detailed => {
            "Start with a `🎯 TITLE:` line naming the video's topic, then `📝`-marked \
             sections with bullet points covering every major topic in order."
        }
        SummaryMode::Chapters => {
            "Present the content as chronological chapters. Give each chapter a short \
             heading and two or three bullet points."
        }
    }
}
