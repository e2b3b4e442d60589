//! Shared text sent by the bot.
//!
//! Keep all user-facing strings in this module so they stay in one place and are
//! easy to update or translate.

use crate::country::Country;

pub const HELP_TEXT: &str = "학교 알림장을 텍스트나 사진으로 보내주세요. \
     번역과 함께 행사, 날짜, 준비물 체크리스트를 정리해 드립니다.\n\
     준비물 버튼을 누르면 체크 표시가 바뀝니다.\n\n\
     <b>명령어:</b>\n\
     /country - 현재 국가 확인 또는 변경 (예: /country 미국)\n\
     /events - 다가오는 행사 보기\n\
     /all - 저장된 모든 행사 보기\n\
     /delete - 행사 삭제 (예: /delete 3)\n\
     /reset - 이 대화의 모든 데이터 삭제\n\
     /info - 시스템 정보";

pub const ANALYSIS_DISABLED: &str = "분석 기능이 비활성화되어 있습니다. GEMINI_API_KEY를 설정해주세요.";
pub const ANALYZING: &str = "🔍 알림장을 분석하고 있습니다...";
pub const ANALYSIS_FAILED: &str = "분석 중 오류가 발생했습니다. 잠시 후 다시 시도해주세요.";
pub const NO_EVENTS_FOUND: &str = "알림장에서 행사 정보를 찾지 못했습니다.";
pub const PHOTO_DOWNLOAD_FAILED: &str = "사진을 내려받지 못했습니다.";

pub const NO_UPCOMING_EVENTS: &str = "다가오는 행사가 없습니다.";
pub const NO_EVENTS: &str = "저장된 행사가 없습니다.";
pub const EVENT_NOT_FOUND: &str = "해당 행사를 찾을 수 없습니다.";
pub const DELETE_USAGE: &str = "삭제할 행사 번호를 입력해주세요. 예: /delete 3";
pub const EVENT_DELETED: &str = "행사를 삭제했습니다.";
pub const CHAT_RESET: &str = "이 대화의 모든 행사와 설정을 삭제했습니다.";

pub const UNDATED: &str = "날짜 미정";
pub const UNNAMED_EVENT: &str = "(이름 없는 행사)";

pub fn current_country_text(country: Country) -> String {
    let options: Vec<&str> = Country::ALL.iter().map(|c| c.key()).collect();
    format!(
        "현재 국가: {}\n변경하려면 /country 뒤에 국가를 입력하세요: {}",
        country.key(),
        options.join(", ")
    )
}

pub fn country_updated_text(country: Country) -> String {
    format!("국가를 {}(으)로 변경했습니다.", country.key())
}

pub fn unknown_country_text(input: &str) -> String {
    let options: Vec<&str> = Country::ALL.iter().map(|c| c.key()).collect();
    format!(
        "알 수 없는 국가입니다: {input}\n선택 가능: {}",
        options.join(", ")
    )
}

pub fn rejected_items_text(items: &[String]) -> String {
    format!(
        "준비물로 보기 어려운 항목 {}개를 제외했습니다: {}",
        items.len(),
        items.join(", ")
    )
}
