use serde::{Deserialize, Serialize};

/// The four mutually exclusive timer phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    Idle,
    Work,
    ShortBreak,
    LongBreak,
}

impl Phase {
    /// Heading shown above the countdown. `cycle_count` is the number of
    /// completed work phases so far.
    pub fn label(self, cycle_count: u32) -> String {
        match self {
            Phase::Work => format!("Focus #{}", cycle_count + 1),
            Phase::ShortBreak => "Short Break".to_string(),
            Phase::LongBreak => "Long Break".to_string(),
            Phase::Idle => "Ready to Focus".to_string(),
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Phase::Idle => "idle",
            Phase::Work => "work",
            Phase::ShortBreak => "shortBreak",
            Phase::LongBreak => "longBreak",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels() {
        assert_eq!(Phase::Work.label(0), "Focus #1");
        assert_eq!(Phase::Work.label(3), "Focus #4");
        assert_eq!(Phase::ShortBreak.label(3), "Short Break");
        assert_eq!(Phase::LongBreak.label(4), "Long Break");
        assert_eq!(Phase::Idle.label(0), "Ready to Focus");
    }

    #[test]
    fn serde_names_match_display() {
        for phase in [Phase::Idle, Phase::Work, Phase::ShortBreak, Phase::LongBreak] {
            let json = serde_json::to_string(&phase).unwrap();
            assert_eq!(json, format!("\"{phase}\""));
        }
    }
}
