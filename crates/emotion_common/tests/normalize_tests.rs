//! Tests for model output normalization.
//!
//! Covers the recovery ladder end to end:
//! 1. Clean JSON parses directly
//! 2. Fenced or prose-wrapped JSON is extracted
//! 3. Stray backticks are cleaned up
//! 4. Anything else degrades to the Neutral default without failing

use emotion_common::{normalize, normalize_with_stage, AnalysisResult, ParseStage};

const JOY: &str = r#"{"emotion":"Joy","confidence":0.92,"explanation":"Upbeat tone.","emoji":"😄","color":"yellow-400"}"#;
const SADNESS: &str = r#"{"emotion":"Sadness","confidence":0.7,"explanation":"Low energy wording.","emoji":"😢","color":"blue-400"}"#;
const ANGER: &str = r#"{"emotion":"Anger","confidence":0.8,"explanation":"Sharp language.","emoji":"😠","color":"red-500"}"#;
const FEAR_NESTED: &str = r#"{"emotion":"Fear","confidence":0.6,"explanation":"Mentions danger.", "meta": {"nested": true}, "emoji":"😨","color":"purple-400"}"#;

fn expected(emotion: &str, confidence: f64, explanation: &str, emoji: &str, color: &str) -> AnalysisResult {
    AnalysisResult {
        emotion: emotion.to_string(),
        confidence,
        explanation: explanation.to_string(),
        emoji: emoji.to_string(),
        color: color.to_string(),
    }
}

fn assert_fallback(raw: &str) {
    let normalized = normalize_with_stage(raw);
    assert_eq!(normalized.stage, ParseStage::Fallback, "input: {:?}", raw);
    assert_eq!(normalized.result, AnalysisResult::fallback());
    assert_eq!(normalized.result.emotion, "Neutral");
    assert_eq!(normalized.result.confidence, 0.0);
}

// =============================================================================
// Concrete scenarios
// =============================================================================

#[test]
fn test_clean_json_parses_directly() {
    let normalized = normalize_with_stage(JOY);
    assert_eq!(normalized.stage, ParseStage::Direct);
    assert_eq!(
        normalized.result,
        expected("Joy", 0.92, "Upbeat tone.", "😄", "yellow-400")
    );
}

#[test]
fn test_json_fence_is_stripped() {
    let raw = format!("```json\n{}\n```", SADNESS);
    let normalized = normalize_with_stage(&raw);
    assert_eq!(normalized.stage, ParseStage::Extracted);
    assert_eq!(
        normalized.result,
        expected("Sadness", 0.7, "Low energy wording.", "😢", "blue-400")
    );
}

#[test]
fn test_bare_fence_is_stripped() {
    let raw = format!("```\n{}\n```", SADNESS);
    assert_eq!(normalize(&raw), normalize(SADNESS));
}

#[test]
fn test_prose_around_json() {
    let raw = format!("Here is the result: {} Hope that helps!", ANGER);
    let normalized = normalize_with_stage(&raw);
    assert_eq!(normalized.stage, ParseStage::Extracted);
    assert_eq!(
        normalized.result,
        expected("Anger", 0.8, "Sharp language.", "😠", "red-500")
    );
}

#[test]
fn test_nested_object_parses_whole() {
    let result = normalize(FEAR_NESTED);
    assert_eq!(
        result,
        expected("Fear", 0.6, "Mentions danger.", "😨", "purple-400")
    );
}

#[test]
fn test_nested_object_followed_by_prose() {
    let raw = format!("{} Note: {{ \"ignored\": 1 }} trailing words", FEAR_NESTED);
    let normalized = normalize_with_stage(&raw);
    assert_eq!(normalized.stage, ParseStage::Extracted);
    assert_eq!(normalized.result.emotion, "Fear");
    assert_eq!(normalized.result.color, "purple-400");
}

#[test]
fn test_plain_sentence_falls_back() {
    assert_fallback("I cannot determine the emotion.");
}

// =============================================================================
// Edge cases
// =============================================================================

#[test]
fn test_stray_backticks_inside_object() {
    let raw = "{\"emotion\":\"Surprise\",\"confidence\":0.55,```\n\"explanation\":\"Unexpected news.\",\"emoji\":\"😮\",\"color\":\"pink-400\"}";
    let normalized = normalize_with_stage(raw);
    assert_eq!(normalized.stage, ParseStage::Cleaned);
    assert_eq!(normalized.result.emotion, "Surprise");
    assert_eq!(normalized.result.confidence, 0.55);
}

#[test]
fn test_fence_marker_left_inside_fenced_object() {
    let raw = "```json\n{\"emotion\":\"Joy\",\"confidence\":0.9,\n```\n\"explanation\":\"x\",\"emoji\":\"😄\",\"color\":\"yellow-400\"}\n```";
    let normalized = normalize_with_stage(raw);
    assert_eq!(normalized.stage, ParseStage::Cleaned);
    assert_eq!(
        normalized.result,
        expected("Joy", 0.9, "x", "😄", "yellow-400")
    );
}

#[test]
fn test_fence_followed_by_prose() {
    let raw = format!("```json\n{}\n```\nLet me know if you need anything else.", JOY);
    assert_eq!(normalize(&raw), normalize(JOY));
}

#[test]
fn test_four_backtick_fence() {
    let raw = format!("````json\n{}\n````", JOY);
    assert_eq!(normalize(&raw), normalize(JOY));
}

#[test]
fn test_single_line_fence() {
    let raw = format!("```json {}```", JOY);
    assert_eq!(normalize(&raw), normalize(JOY));
}

#[test]
fn test_surrounding_whitespace() {
    let raw = format!("\n\n   {}   \n", JOY);
    assert_eq!(normalize_with_stage(&raw).stage, ParseStage::Direct);
}

#[test]
fn test_braces_inside_explanation() {
    let raw = r#"Result: {"emotion":"Joy","confidence":0.9,"explanation":"Smiley {:} face","emoji":"😄","color":"yellow-400"} done {"#;
    let result = normalize(raw);
    assert_eq!(result.explanation, "Smiley {:} face");
}

#[test]
fn test_integer_confidence_accepted() {
    let raw = r#"{"emotion":"Joy","confidence":1,"explanation":"Certain.","emoji":"😄","color":"yellow-400"}"#;
    assert_eq!(normalize(raw).confidence, 1.0);
}

#[test]
fn test_unvalidated_label_and_range_pass_through() {
    let raw = r#"{"emotion":"Nostalgia","confidence":1.4,"explanation":"x","emoji":"🥲","color":"teal-300"}"#;
    let result = normalize(raw);
    assert_eq!(result.emotion, "Nostalgia");
    assert_eq!(result.confidence, 1.4);
}

#[test]
fn test_empty_input_falls_back() {
    assert_fallback("");
    assert_fallback("   \n\t ");
}

#[test]
fn test_not_json_falls_back() {
    assert_fallback("not json at all");
}

#[test]
fn test_missing_field_falls_back() {
    assert_fallback(r#"{"emotion":"Joy","confidence":0.9,"explanation":"x","emoji":"😄"}"#);
}

#[test]
fn test_wrong_json_types_fall_back() {
    assert_fallback(r#"{"emotion":"Joy","confidence":"high","explanation":"x","emoji":"😄","color":"yellow-400"}"#);
    assert_fallback(r#"["Joy", 0.9]"#);
    assert_fallback("\"Joy\"");
    assert_fallback("42");
    assert_fallback(r#"["Joy", 0.9, "x", "😄", "yellow-400"]"#);
}

#[test]
fn test_unbalanced_braces_fall_back() {
    assert_fallback("{{{{");
    assert_fallback("}}}} {");
    assert_fallback("{\"emotion\":\"Joy\",\"confidence\":0.9");
}

#[test]
fn test_only_backticks_falls_back() {
    assert_fallback("```");
    assert_fallback("``````");
    assert_fallback("```json\n```");
}

#[test]
fn test_very_long_garbage_falls_back() {
    let raw = format!("{}{}", "{".repeat(50_000), "x".repeat(200_000));
    assert_fallback(&raw);
}

#[test]
fn test_multibyte_garbage_falls_back() {
    assert_fallback("😀😀😀 {\u{0} \u{FFFD}} ```é```");
}

// =============================================================================
// Properties
// =============================================================================

fn samples() -> Vec<&'static str> {
    vec![JOY, SADNESS, ANGER, FEAR_NESTED]
}

#[test]
fn test_valid_json_equals_parsed_object() {
    for json in samples() {
        let parsed: AnalysisResult = serde_json::from_str(json).unwrap();
        assert_eq!(normalize(json), parsed);
    }
}

#[test]
fn test_fenced_equals_unfenced() {
    for json in samples() {
        let fenced = format!("```json\n{}\n```", json);
        assert_eq!(normalize(&fenced), normalize(json));
    }
}

#[test]
fn test_prose_wrapped_equals_unwrapped() {
    let prose = [
        "Sure!",
        "Here is my analysis:\n",
        "The speaker sounds (mostly) calm.",
        "Émotion détectée ->",
    ];
    for json in samples() {
        for p in prose {
            let wrapped = format!("{}{}{}", p, json, p);
            assert_eq!(normalize(&wrapped), normalize(json), "prose: {:?}", p);
        }
    }
}

#[test]
fn test_never_panics_on_prefixes() {
    // Every truncation of a fenced response must still produce a result
    let raw = format!("```json\n{}\n```", FEAR_NESTED);
    for (idx, _) in raw.char_indices() {
        let result = normalize(&raw[..idx]);
        assert!(!result.emotion.is_empty());
    }
}
