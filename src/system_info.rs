use git_version::git_version;

use crate::ai::AiConfig;

// include -modified if the working tree has uncommitted changes
const COMMIT: &str = git_version!(
    args = ["--abbrev=10", "--always", "--dirty=-modified"],
    fallback = "unknown"
);

fn version() -> String {
    let latest = option_env!("LATEST_TAG").unwrap_or("");
    let ahead = option_env!("COMMITS_AHEAD").unwrap_or("");
    match option_env!("RELEASE_VERSION") {
        Some(tag) if !tag.is_empty() => format!("release {}", tag),
        _ if !latest.is_empty() && !ahead.is_empty() => {
            format!("development branch {} commits ahead of {}", ahead, latest)
        }
        _ if !latest.is_empty() => format!("development branch ahead of {}", latest),
        _ => "development".to_string(),
    }
}

/// Build and analysis summary shown by `/info`.
pub fn get_system_info(ai: Option<&AiConfig>) -> String {
    let profile = if cfg!(debug_assertions) {
        "Dev"
    } else {
        "Release"
    };

    let analysis = match ai {
        Some(config) => format!("Models: {}", config.candidate_models(true).join(", ")),
        None => "Analysis disabled".to_string(),
    };

    format!(
        "{} - {}\nCommit: {}\n{} build\n{}",
        env!("CARGO_PKG_NAME"),
        version(),
        COMMIT,
        profile,
        analysis
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_build_and_models() {
        let info = get_system_info(Some(&AiConfig::new("k")));
        assert!(info.starts_with("sensecoach - "));
        assert!(info.contains(COMMIT));
        assert!(info.contains("Dev build") || info.contains("Release build"));
        assert!(info.contains("release") || info.contains("development"));
        assert!(info.contains("gemini-2.0-flash, gemini-2.0-flash-exp"));
        assert!(info.ends_with("gemini-pro-vision"));
    }

    #[test]
    fn reports_disabled_analysis() {
        assert!(get_system_info(None).ends_with("Analysis disabled"));
    }
}
