//! Prompt sent to the model for every notice.
//!
//! The headings and their order here are what [`crate::parser`] expects back,
//! so edits to the block layout need a matching parser change.

use crate::country::Country;
use crate::parser::EVENT_SEPARATOR;

/// Appended when the notice arrives as free text.
const TEXT_INSTRUCTION: &str = "다음 학교 알림장을 분석해주세요:";

/// Appended when the notice is an attached photo.
const IMAGE_INSTRUCTION: &str =
    "업로드된 이미지의 학교 알림장을 분석해주세요. 이미지에서 텍스트를 정확히 읽고 분석해주세요.";

const GENERIC_INSTRUCTION: &str = "학교 알림장을 분석해주세요.";

/// Builds the analysis prompt for `country_key`.
///
/// Unknown keys use the generic profile. `free_text` is appended verbatim and
/// takes precedence over `has_image`.
pub fn build_prompt(country_key: &str, free_text: Option<&str>, has_image: bool) -> String {
    let profile = Country::from_key(country_key).profile();
    let name = profile.name;

    let mut prompt = format!(
        "당신은 {name}의 교육 문화와 기념일을 잘 아는 전문가입니다.

다음 배경 정보를 바탕으로 학교 알림장을 분석해주세요:
{culture}

알림장에 여러 개의 행사가 있다면 각 행사를 모두 찾아 행사마다 아래 형식의 블록을 하나씩 작성해주세요.
행사 블록 사이에는 `{EVENT_SEPARATOR}` 한 줄을 넣고, 마지막 블록 뒤에는 넣지 마세요.

🌐 **원문 번역 (한국어)**:
[해당 행사와 관련된 원문을 한국어로 정확하고 자연스럽게 번역해주세요. 현지 특유의 표현에는 주석을 달아주세요.]

📌 **행사명**: [행사 이름을 명확하게]
📅 **일시**: [날짜는 YYYY-MM-DD 형식으로, 시간은 HH:MM 형식으로]
✅ **준비물 체크리스트**:
- [준비물 1] (현지 용어가 있으면 함께 표기)
- [준비물 2]
...

🌍 **Cultural Context (문화적 배경)**:
[{guidance} 각 포인트는 2-3문장 이내로 간결하게 작성해주세요.]

💡 **실용적인 팁**:
[실제로 준비할 때 유용한 팁과 주의사항을 불릿포인트로 제공해주세요. 각 팁은 2-3문장 이내로 작성해주세요.]

**중요한 작성 지침:**
- 제목(🌐, 📌, 📅, ✅, 🌍, 💡)의 순서와 표기를 그대로 지켜주세요
- 준비물이 없으면 체크리스트 항목을 비워두세요
- Cultural Context와 실용적인 팁은 핵심만 간결하게 전달해주세요

응답은 한국어로, 친근하고 따뜻한 톤으로 작성해주세요.",
        culture = profile.culture,
        guidance = profile.context_guidance,
    );

    match free_text {
        Some(text) => {
            prompt.push_str("\n\n");
            prompt.push_str(TEXT_INSTRUCTION);
            prompt.push_str("\n\n");
            prompt.push_str(text);
        }
        None if has_image => {
            prompt.push_str("\n\n");
            prompt.push_str(IMAGE_INSTRUCTION);
        }
        None => {
            prompt.push_str("\n\n");
            prompt.push_str(GENERIC_INSTRUCTION);
        }
    }
    prompt
}
