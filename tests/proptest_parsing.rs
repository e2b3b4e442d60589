use proptest::prelude::*;
use sensecoach::checklist::is_valid_checklist_item;
use sensecoach::parser::{extract_date, EVENT_SEPARATOR};
use sensecoach::{parse_analysis_result, parse_with_diagnostics};

// Property: parsing never panics for arbitrary input
proptest! {
    #[test]
    fn prop_parse_no_panic(s in "(?s).*") {
        let _ = parse_with_diagnostics(&s, "네덜란드");
    }

    #[test]
    fn prop_date_extraction_no_panic(s in "(?s).*") {
        let _ = extract_date(&s);
    }
}

fn heading_soup() -> impl Strategy<Value = String> {
    let pieces = prop::sample::select(vec![
        "📌 행사명: ",
        "📅 일시: ",
        "✅ 준비물:\n",
        "🌐 원문 번역: ",
        "🌍 문화적 배경: ",
        "💡 실용적인 팁: ",
        "**준비물**\n",
        "- ",
        "- 없음\n",
        "\n",
        "2026-05-08 ",
        "2026년 6월 1일 ",
        "10:00 ",
        "도시락 ",
        "---\n",
        "---EVENT_SEPARATOR---\n",
    ]);
    prop::collection::vec(pieces, 0..40).prop_map(|parts| parts.concat())
}

proptest! {
    #[test]
    fn prop_items_always_valid(raw in heading_soup()) {
        for event in parse_analysis_result(&raw, "미국") {
            for item in &event.checklist_items {
                prop_assert!(is_valid_checklist_item(item), "invalid item {:?}", item);
            }
        }
    }

    #[test]
    fn prop_at_most_one_event_per_segment(raw in heading_soup()) {
        let segments = raw
            .split(EVENT_SEPARATOR)
            .filter(|s| !s.trim().is_empty())
            .count();
        let outcome = parse_with_diagnostics(&raw, "미국");
        prop_assert!(outcome.events.len() <= segments);
        prop_assert_eq!(outcome.events.len() + outcome.dropped_segments, segments);
    }

    #[test]
    fn prop_parsing_is_deterministic(raw in heading_soup()) {
        prop_assert_eq!(
            parse_with_diagnostics(&raw, "독일"),
            parse_with_diagnostics(&raw, "독일")
        );
    }

    #[test]
    fn prop_country_and_memo(raw in heading_soup(), country in "[가-힣]{1,4}") {
        for event in parse_analysis_result(&raw, &country) {
            prop_assert_eq!(&event.country, &country);
            prop_assert!(event.memo.is_empty());
        }
    }

    #[test]
    fn prop_dates_are_iso(raw in heading_soup()) {
        for event in parse_analysis_result(&raw, "영국") {
            if !event.event_date.is_empty() {
                let parts: Vec<&str> = event.event_date.split('-').collect();
                prop_assert_eq!(parts.len(), 3);
                prop_assert_eq!(parts[0].len(), 4);
                prop_assert_eq!(parts[1].len(), 2);
                prop_assert_eq!(parts[2].len(), 2);
            }
        }
    }
}

proptest! {
    #[test]
    fn prop_validator_is_stable_under_trimming(s in "\\PC{0,40}") {
        let judged = is_valid_checklist_item(&s);
        prop_assert_eq!(judged, is_valid_checklist_item(&s));
        prop_assert_eq!(judged, is_valid_checklist_item(s.trim()));
    }
}
