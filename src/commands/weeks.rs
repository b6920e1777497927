use crate::commands::Out;
use crate::selection::WeekOption;
use crate::session::Session;
use crate::week_index::{WeekIndex, WeekPart};
use crate::{Config, Mode, Result};

/// Lists every week segment that holds at least one transaction, most recent first. Both halves
/// of a week that crosses into a new month are listed.
pub async fn weeks(config: Config, mode: Mode) -> Result<Out<Vec<WeekOption>>> {
    let session = Session::open(&config, mode).await?;
    let index = WeekIndex::build(session.transactions());
    let options = WeekOption::list(&index);
    if options.is_empty() {
        return Ok(Out::new("There are no dated transactions", options));
    }
    let lines: Vec<String> = options.iter().map(render_option).collect();
    Ok(Out::new(lines.join("\n"), options))
}

fn render_option(option: &WeekOption) -> String {
    let suffix = match option.part {
        WeekPart::Whole => "",
        WeekPart::FirstHalf => " (first half)",
        WeekPart::SecondHalf => " (second half)",
    };
    format!("{}  {}{suffix}", option.key, option.label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_weeks() {
        let env = TestEnv::new().await;
        let out = weeks(env.config(), env.mode()).await.unwrap();
        let keys: Vec<String> = out
            .structure()
            .unwrap()
            .iter()
            .map(|w| w.key.to_string())
            .collect();
        assert_eq!(
            keys,
            vec![
                "2024-02-05",
                "2024-02-01",
                "2024-01-29",
                "2024-01-22",
                "2024-01-15",
                "2024-01-08",
                "2024-01-01",
            ]
        );
        let lines: Vec<&str> = out.message().lines().collect();
        assert_eq!(lines[1], "2024-02-01  Feb 01 - Feb 04, 2024 (second half)");
        assert_eq!(lines[2], "2024-01-29  Jan 29 - Jan 31, 2024 (first half)");
        assert_eq!(lines[3], "2024-01-22  Jan 22 - Jan 28, 2024");
    }
}
