//! Country profiles injected into the analysis prompt.

use std::fmt;
use std::str::FromStr;

/// Static description of a country's school culture.
#[derive(Debug, PartialEq, Eq)]
pub struct CountryProfile {
    pub name: &'static str,
    pub culture: &'static str,
    pub context_guidance: &'static str,
}

/// Countries with a dedicated profile. Everything else maps to [`Country::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Country {
    #[default]
    Netherlands,
    UnitedStates,
    Germany,
    UnitedKingdom,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCountry(pub String);

impl fmt::Display for UnknownCountry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown country: {}", self.0)
    }
}

impl std::error::Error for UnknownCountry {}

impl Country {
    pub const ALL: [Country; 5] = [
        Country::Netherlands,
        Country::UnitedStates,
        Country::Germany,
        Country::UnitedKingdom,
        Country::Other,
    ];

    /// Storage key, also the value shown to users.
    pub fn key(self) -> &'static str {
        match self {
            Country::Netherlands => "네덜란드",
            Country::UnitedStates => "미국",
            Country::Germany => "독일",
            Country::UnitedKingdom => "영국",
            Country::Other => "기타",
        }
    }

    /// Exact-key lookup. Unknown keys fall back to [`Country::Other`].
    pub fn from_key(key: &str) -> Country {
        Country::ALL
            .into_iter()
            .find(|c| c.key() == key)
            .unwrap_or(Country::Other)
    }

    pub fn profile(self) -> &'static CountryProfile {
        match self {
            Country::Netherlands => &NETHERLANDS,
            Country::UnitedStates => &UNITED_STATES,
            Country::Germany => &GERMANY,
            Country::UnitedKingdom => &UNITED_KINGDOM,
            Country::Other => &OTHER,
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            Country::Netherlands => &["nl", "netherlands", "holland", "dutch"],
            Country::UnitedStates => &["us", "usa", "united states", "america"],
            Country::Germany => &["de", "germany", "deutschland"],
            Country::UnitedKingdom => &["uk", "gb", "united kingdom", "britain", "england"],
            Country::Other => &["other", "etc"],
        }
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Strict parsing for user input: accepts the Korean keys and a few English
/// aliases, rejects anything else instead of falling back.
impl FromStr for Country {
    type Err = UnknownCountry;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        let lower = needle.to_lowercase();
        Country::ALL
            .into_iter()
            .find(|c| c.key() == needle || c.aliases().contains(&lower.as_str()))
            .ok_or_else(|| UnknownCountry(needle.to_string()))
    }
}

static NETHERLANDS: CountryProfile = CountryProfile {
    name: "네덜란드",
    culture: "네덜란드 교육 시스템은 매우 개방적이고 실용적이며, 자유로운 분위기가 특징입니다.

**주요 행사 및 기념일:**
- Studiedag (스투디다흐): 교사 연수일로 아이들이 등교하지 않습니다. 보통 학기 중 2-3회 있습니다.
- Koningsdag (코닝스다흐, 국왕의 날): 4월 27일, 오렌지색으로 치장하고 거리 축제가 열립니다.
- Sinterklaas (신테르클라스): 12월 5일, 아이들에게 선물을 주는 중요한 전통 행사입니다.
- Ouderspreekavond (아우더스프레이크아본트): 학부모 상담일
- Schoolreisje (스훌레이셰): 학교 여행/소풍

**교육 문화 특징:**
- 매우 개방적이고 비공식적인 분위기
- 교사와 학부모 간의 수평적 관계
- 조기 하교가 일반적 (보통 오후 3시 전)
- 생일에는 학교에서 간식을 나눕니다 (traktatie 준비 필요)",
    context_guidance: "네덜란드의 개방적이고 실용적인 교육 문화, 자유로운 분위기, 그리고 학부모 참여 방식의 특징을 반영하여 설명해주세요.",
};

static UNITED_STATES: CountryProfile = CountryProfile {
    name: "미국",
    culture: "미국 학교는 학부모 참여가 매우 활발하고, 다양한 행사와 문화적 기념일이 중요합니다.

**주요 행사 및 기념일:**
- PTA (Parent-Teacher Association) 모임: 학부모 교사 협회 정기 모임
- Field Trip (필드트립): 교육적 현장 학습
- Picture Day (포토데이): 학교 사진 촬영일
- Thanksgiving (추수감사절): 11월 넷째 목요일, 가족 모임이 중요
- Halloween (할로윈): 10월 31일, 코스튬과 사탕
- Martin Luther King Jr. Day, Presidents' Day, Memorial Day 등 공휴일

**교육 문화 특징:**
- 학부모 자원봉사가 매우 활발함
- 다양한 문화적 배경의 학생들
- Fundraising 행사가 많음
- 교사와 학부모 간의 정기적인 소통",
    context_guidance: "미국의 활발한 학부모 참여 문화, 다양한 문화적 배경, 그리고 학부모가 알아야 할 행사 준비 방법을 반영하여 설명해주세요.",
};

static GERMANY: CountryProfile = CountryProfile {
    name: "독일",
    culture: "독일 교육은 연방제로 인해 주(Bundesland)별로 차이가 크며, 구조화된 시스템이 특징입니다.

**주요 행사 및 기념일:**
- Schulfest (슐페스트): 학교 축제, 보통 여름에 열립니다
- Wandertag (반데르타크): 소풍/하이킹의 날
- Elternabend (엘테른아벤트): 학부모 모임
- Einschulung (아인슐룽): 초등학교 입학식, Schultüte(슐튀테) 준비 필요
- 주별로 공휴일과 방학 일정이 다름

**교육 문화 특징:**
- 구조화되고 체계적인 교육 접근
- 시간 약속과 규칙 준수를 중시
- 학부모 참여는 중요하지만 공식적
- 생일 파티는 보통 집에서, 학교에서는 간단히 축하",
    context_guidance: "독일의 주별 차이, 구조화된 교육 시스템, 그리고 학부모가 알아야 할 지역별 특성을 반영하여 설명해주세요.",
};

static UNITED_KINGDOM: CountryProfile = CountryProfile {
    name: "영국",
    culture: "영국 학교는 전통적이면서도 현대적인 교육 시스템을 가지고 있으며, 하우스 시스템과 교복 규정이 특징입니다.

**주요 행사 및 기념일:**
- Parents' Evening (페어런츠 이브닝): 학부모 상담
- Sports Day (스포츠 데이): 운동회, 하우스별 경쟁
- INSET Day (인셋 데이): 교사 연수일, 학생은 등교하지 않습니다
- Bank Holiday: 공휴일 (5월, 8월 등)
- Harvest Festival: 가을 추수 행사
- Christmas Nativity: 크리스마스 연극/공연

**교육 문화 특징:**
- 하우스(House) 시스템으로 학생들을 그룹화
- 엄격한 교복 규정
- 학부모 참여는 중요하지만 공식적
- 학교 규칙과 예의가 중요함",
    context_guidance: "영국의 전통적 교육 시스템, 하우스 시스템, 그리고 학부모가 알아야 할 학교 문화와 예의를 반영하여 설명해주세요.",
};

static OTHER: CountryProfile = CountryProfile {
    name: "기타 국가",
    culture: "해당 국가의 고유한 교육 문화, 주요 기념일, 학교 행사 전통을 고려하여 분석합니다.

**일반적인 고려사항:**
- 해당 국가의 교육 시스템 특징
- 주요 공휴일과 문화적 기념일
- 학교 행사 전통과 관습
- 학부모 참여 방식",
    context_guidance: "해당 국가의 교육 문화, 주요 기념일, 학교 행사 전통, 그리고 학부모가 알아야 할 문화적 맥락을 반영하여 설명해주세요.",
};
