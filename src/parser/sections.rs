//! Heading tokenizer for a single event segment.
//!
//! All six headings are matched by one combined regex, so a segment is scanned
//! once. A heading is either a glyph (`📌`, optionally followed by its label) or
//! a keyword label at the start of a line that is bold-wrapped or followed by
//! a colon. Each heading owns the text up to the next heading of another kind.

use std::sync::LazyLock;

use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeadingKind {
    Translation,
    EventName,
    DateTime,
    Checklist,
    CulturalContext,
    Tips,
}

impl HeadingKind {
    pub const ALL: [HeadingKind; 6] = [
        HeadingKind::Translation,
        HeadingKind::EventName,
        HeadingKind::DateTime,
        HeadingKind::Checklist,
        HeadingKind::CulturalContext,
        HeadingKind::Tips,
    ];

    fn group(self) -> &'static str {
        match self {
            HeadingKind::Translation => "translation",
            HeadingKind::EventName => "event_name",
            HeadingKind::DateTime => "date_time",
            HeadingKind::Checklist => "checklist",
            HeadingKind::CulturalContext => "cultural_context",
            HeadingKind::Tips => "tips",
        }
    }

    fn glyph(self) -> &'static str {
        match self {
            HeadingKind::Translation => "🌐",
            HeadingKind::EventName => "📌",
            HeadingKind::DateTime => "📅",
            HeadingKind::Checklist => "✅",
            HeadingKind::CulturalContext => "🌍",
            HeadingKind::Tips => "💡",
        }
    }

    /// Regex alternatives for the label keyword, longest first.
    fn keywords(self) -> &'static str {
        match self {
            HeadingKind::Translation => r"원문[ \t]*번역|번역|translation",
            HeadingKind::EventName => r"행사명|행사[ \t]*이름|event[ \t]*name",
            HeadingKind::DateTime => r"일시|날짜|date[ \t]*(?:/|&|and)?[ \t]*time|date",
            HeadingKind::Checklist => {
                r"준비물(?:[ \t]*(?:체크[ \t]*리스트|목록))?|checklist|items[ \t]+to[ \t]+bring"
            }
            HeadingKind::CulturalContext => {
                r"cultural[ \t]*context|문화적[ \t]*배경|문화[ \t]*배경"
            }
            HeadingKind::Tips => r"실용적인[ \t]*팁|팁|practical[ \t]*tips?|tips?",
        }
    }

    fn pattern(self) -> String {
        let kw = format!(r"(?i:{})", self.keywords());
        let qualifier = r"(?:[ \t]*\([^)\n]*\))?";
        let label = format!(r"(?:\*\*[ \t]*)?(?:{kw}){qualifier}[ \t]*:?[ \t]*(?:\*\*)?[ \t]*:?");
        let glyph_form = format!(
            r"{glyph}\x{{FE0F}}?[ \t]*(?:{label}|\*\*[^*\n]+\*\*[ \t]*:)?",
            glyph = regex::escape(self.glyph()),
        );
        let line_form = format!(
            r"(?m:^)[ \t]*(?:#{{1,6}}[ \t]*)?(?:\*\*[ \t]*(?:{kw}){qualifier}[ \t]*:?[ \t]*\*\*[ \t]*:?|(?:{kw}){qualifier}[ \t]*:)"
        );
        format!("(?P<{}>{glyph_form}|{line_form})", self.group())
    }
}

static HEADINGS: LazyLock<Regex> = LazyLock::new(|| {
    let alternatives: Vec<String> = HeadingKind::ALL.iter().map(|k| k.pattern()).collect();
    Regex::new(&alternatives.join("|")).expect("valid heading regex")
});

/// A heading found in a segment. `body` is the text it owns, label stripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section<'a> {
    pub kind: HeadingKind,
    pub body: &'a str,
}

#[derive(Debug, Clone, Copy)]
struct Marker {
    kind: HeadingKind,
    start: usize,
    end: usize,
    glyph: bool,
    bold: bool,
}

impl Marker {
    fn is_strong(&self) -> bool {
        self.glyph || self.bold
    }
}

impl HeadingKind {
    /// Kinds whose body is free prose that may quote `keyword:` lines.
    fn is_free_text(self) -> bool {
        matches!(
            self,
            HeadingKind::Translation | HeadingKind::CulturalContext | HeadingKind::Tips
        )
    }
}

/// Finds heading markers.
///
/// A plain `keyword:` line is content, not a heading, when the segment also
/// has a glyph or bold heading of the same kind, or when it sits inside a
/// free-text section opened by a glyph or bold heading. A translated notice
/// often contains lines like `일시: ...`.
fn scan_markers(segment: &str) -> Vec<Marker> {
    let mut markers: Vec<Marker> = HEADINGS
        .captures_iter(segment)
        .filter_map(|caps| {
            HeadingKind::ALL.into_iter().find_map(|kind| {
                caps.name(kind.group()).map(|m| Marker {
                    kind,
                    start: m.start(),
                    end: m.end(),
                    glyph: m.as_str().starts_with(kind.glyph()),
                    bold: m.as_str().contains("**"),
                })
            })
        })
        .collect();

    let strong: Vec<Marker> = markers.iter().copied().filter(Marker::is_strong).collect();
    markers.retain(|m| {
        if m.is_strong() {
            return true;
        }
        if strong.iter().any(|s| s.kind == m.kind) {
            return false;
        }
        let enclosing = strong.iter().take_while(|s| s.start < m.start).last();
        !enclosing.is_some_and(|s| s.kind.is_free_text())
    });
    markers
}

/// Splits `segment` into heading sections in order of appearance.
///
/// A section runs from the end of its heading to the start of the next
/// heading of a different kind (or the end of the segment). Repeated headings
/// of the same kind inside that range stay part of the body. Text before the
/// first heading is ignored.
pub fn split_sections(segment: &str) -> Vec<Section<'_>> {
    let markers = scan_markers(segment);
    let mut sections = Vec::new();
    let mut idx = 0;
    while idx < markers.len() {
        let marker = markers[idx];
        let next_other = markers[idx + 1..]
            .iter()
            .position(|m| m.kind != marker.kind)
            .map(|offset| idx + 1 + offset);
        let end = next_other.map_or(segment.len(), |n| markers[n].start);
        sections.push(Section {
            kind: marker.kind,
            body: &segment[marker.end..end],
        });
        idx = next_other.unwrap_or(markers.len());
    }
    sections
}

/// First section of `kind`, if any.
pub fn find_section<'a>(sections: &[Section<'a>], kind: HeadingKind) -> Option<&'a str> {
    sections.iter().find(|s| s.kind == kind).map(|s| s.body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<HeadingKind> {
        split_sections(text).iter().map(|s| s.kind).collect()
    }

    #[test]
    fn finds_glyph_headings_in_order() {
        let text = "🌐 **원문 번역 (한국어)**:\n안녕하세요\n\n📌 **행사명**: 운동회\n📅 **일시**: 2026-05-01\n✅ **준비물 체크리스트**:\n- 물통\n\n🌍 **Cultural Context (문화적 배경)**:\n설명\n\n💡 **실용적인 팁**:\n팁 내용";
        assert_eq!(kinds(text), HeadingKind::ALL.to_vec());
        let sections = split_sections(text);
        assert_eq!(sections[0].body.trim(), "안녕하세요");
        assert_eq!(sections[1].body.trim(), "운동회");
        assert_eq!(sections[5].body.trim(), "팁 내용");
    }

    #[test]
    fn keyword_headings_without_glyphs() {
        let text = "**행사명**: 소풍\n**일시**: 2026년 4월 3일\n준비물:\n- 도시락";
        let sections = split_sections(text);
        assert_eq!(
            kinds(text),
            vec![
                HeadingKind::EventName,
                HeadingKind::DateTime,
                HeadingKind::Checklist
            ]
        );
        assert_eq!(sections[0].body.trim(), "소풍");
        assert_eq!(sections[1].body.trim(), "2026년 4월 3일");
    }

    #[test]
    fn keyword_inside_sentence_is_not_a_heading() {
        let text = "📌 **행사명**: 학부모 상담\n💡 **팁**:\n상담 전에 질문을 준비하세요. 일시는 변경될 수 있어요.";
        assert_eq!(kinds(text), vec![HeadingKind::EventName, HeadingKind::Tips]);
    }

    #[test]
    fn bold_label_with_inner_colon() {
        let text = "**Event name:** Sports Day\n**Date:** 2026-06-12";
        let sections = split_sections(text);
        assert_eq!(sections[0].kind, HeadingKind::EventName);
        assert_eq!(sections[0].body.trim(), "Sports Day");
        assert_eq!(sections[1].kind, HeadingKind::DateTime);
    }

    #[test]
    fn repeated_heading_stays_in_body() {
        let text = "💡 **실용적인 팁**:\n첫 번째\n💡 두 번째\n📌 **행사명**: X";
        let sections = split_sections(text);
        assert_eq!(sections.len(), 2);
        assert!(sections[0].body.contains("첫 번째"));
        assert!(sections[0].body.contains("두 번째"));
        assert_eq!(find_section(&sections, HeadingKind::EventName).map(str::trim), Some("X"));
    }

    #[test]
    fn glyph_with_variation_selector() {
        let text = "✅\u{fe0f} 준비물: \n- 우비";
        let sections = split_sections(text);
        assert_eq!(sections[0].kind, HeadingKind::Checklist);
        assert_eq!(sections[0].body.trim(), "- 우비");
    }

    #[test]
    fn plain_labels_in_translation_do_not_split_glyph_sections() {
        let text = "🌐 **원문 번역**:\n운동회 안내\n일시: 5월 1일\n준비물: 도시락\n\n📅 **일시**: 2026-05-01";
        let sections = split_sections(text);
        assert_eq!(
            kinds(text),
            vec![HeadingKind::Translation, HeadingKind::DateTime]
        );
        assert!(sections[0].body.contains("일시: 5월 1일"));
        assert!(sections[0].body.contains("준비물: 도시락"));
        assert_eq!(sections[1].body.trim(), "2026-05-01");
    }

    #[test]
    fn plain_labels_after_glyph_heading_still_count() {
        let text = "📌 **행사명**: 운동회\n일시: 2026-05-08 09:30\n준비물:\n- 도시락";
        assert_eq!(
            kinds(text),
            vec![
                HeadingKind::EventName,
                HeadingKind::DateTime,
                HeadingKind::Checklist
            ]
        );
    }

    #[test]
    fn plain_label_yields_to_glyph_heading_of_same_kind() {
        let text = "📌 **행사명**: 소풍\n행사명: 다른 이름\n💡 **팁**:\n날씨 확인";
        let sections = split_sections(text);
        assert_eq!(kinds(text), vec![HeadingKind::EventName, HeadingKind::Tips]);
        assert!(sections[0].body.contains("다른 이름"));
    }

    #[test]
    fn no_headings_means_no_sections() {
        assert!(split_sections("just some chatter from the model").is_empty());
        assert!(split_sections("").is_empty());
    }
}
