// Dated CSV snapshot -> pipeline -> display rows

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use prop_edge::config::Config;
    use prop_edge::diagnostic::{build_play_rows, rejection_summary, skipped_headline};
    use prop_edge::engine::normalize::RowSource;
    use prop_edge::engine::odds::best_quote;
    use prop_edge::engine::types::{MatchupState, Side, StatCategory};
    use prop_edge::feed::snapshot_dir::{latest_date, CsvSnapshotDir};
    use prop_edge::feed::SnapshotSource;
    use prop_edge::pipeline;
    use std::fs;
    use std::path::Path;

    const DVP: &str = "team,position,stat,rank,value
LAC,C,PTS,1,8.5
Los Angeles Clippers,C,REB,WORST,3.0
BOS,PG,PTS,abc,1.0
LAC,C,PTS,2,9.0
";

    const LAST_N: &str = "player,team,games,mpg,pts,trb,ast
Nikola Jokic,DEN,5,30,22,12,9
Rookie Guy,DEN,1,20,10,,
";

    const LINEUPS: &str = "player,team,position,status
Nikola Jokic,DEN,C,
Rookie Guy,DEN,C,
Injured Guy,DEN,PF,Out
";

    const SCHEDULE: &str = "home,away
Denver,LA Clippers
";

    const ODDS: &str = "player,stat,line,over,under,book
Nikola Jokic,PTS,21.5,-110,-110,DraftKings
Nikola Jokic,PTS,21.5,-105,-115,FanDuel
";

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
    }

    fn write_snapshot(root: &Path) {
        let dir = root.join("2025-01-15");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("dvp.csv"), DVP).unwrap();
        fs::write(dir.join("last_n.csv"), LAST_N).unwrap();
        fs::write(dir.join("lineups.csv"), LINEUPS).unwrap();
        fs::write(dir.join("schedule.csv"), SCHEDULE).unwrap();
        fs::write(dir.join("odds.csv"), ODDS).unwrap();
    }

    #[tokio::test]
    async fn test_latest_date_ignores_non_date_entries() {
        let tmp = tempfile::tempdir().unwrap();
        write_snapshot(tmp.path());
        fs::create_dir_all(tmp.path().join("2025-01-14")).unwrap();
        fs::create_dir_all(tmp.path().join("notes")).unwrap();
        fs::write(tmp.path().join("2025-02-01"), "not a folder").unwrap();

        assert_eq!(latest_date(tmp.path()).await.unwrap(), Some(date()));

        let empty = tempfile::tempdir().unwrap();
        assert_eq!(latest_date(empty.path()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_missing_required_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("2025-01-14")).unwrap();
        let mut source = CsvSnapshotDir::new(tmp.path());
        let err = source
            .load(NaiveDate::from_ymd_opt(2025, 1, 14).unwrap())
            .await
            .unwrap_err();
        assert!(format!("{:#}", err).contains("dvp.csv"));
    }

    #[tokio::test]
    async fn test_long_recent_file_preferred_over_wide() {
        let tmp = tempfile::tempdir().unwrap();
        write_snapshot(tmp.path());
        fs::write(
            tmp.path().join("2025-01-15").join("recent.csv"),
            "player,stat,games,average,mpg\nNikola Jokic,AST,5,9.5,34\n",
        )
        .unwrap();

        let mut source = CsvSnapshotDir::new(tmp.path());
        let raw = source.load(date()).await.unwrap();
        assert_eq!(raw.recent.len(), 1);
        assert_eq!(raw.recent[0].stat.as_deref(), Some("AST"));
        assert!(raw.schedule.len() == 1 && raw.odds.len() == 2);
    }

    #[tokio::test]
    async fn test_bad_rows_skipped_and_batch_proceeds() {
        let tmp = tempfile::tempdir().unwrap();
        write_snapshot(tmp.path());

        let config = Config::default();
        let mut source = CsvSnapshotDir::new(tmp.path());
        let report = pipeline::run_from_source(&mut source, date(), &config)
            .await
            .unwrap();

        // Jokic: PTS, REB, AST plus the PR/PA/PRA combos. Rookie Guy has one game.
        assert_eq!(report.plays.len(), 6);
        assert!(report.plays.iter().all(|p| p.player == "nikola jokic" && p.rank == 1));
        assert!(report.plays.iter().all(|p| p.opponent == "LAC"));

        let pts = report
            .plays
            .iter()
            .find(|p| p.stat == StatCategory::Points)
            .unwrap();
        assert_eq!(pts.matchup, MatchupState::Applied);
        assert!(pts.blended_projection > 22.0);
        let ast = report
            .plays
            .iter()
            .find(|p| p.stat == StatCategory::Assists)
            .unwrap();
        assert_eq!(ast.matchup, MatchupState::NoRating);
        assert_eq!(ast.blended_projection, 9.0);

        // DVP: bad rank + duplicate; lineup: inactive player
        assert_eq!(report.skipped(), 3);
        assert_eq!(
            report.rejected.iter().filter(|r| r.source == RowSource::Dvp).count(),
            2
        );
        assert_eq!(report.rejected.iter().filter(|r| r.reason.kind() == "inactive").count(), 1);
        assert_eq!(rejection_summary(&report.rejected).iter().map(|(_, n)| n).sum::<usize>(), 3);
        assert!(skipped_headline(&report.rejected).unwrap().starts_with("3 rows skipped"));

        let best = best_quote(&report.odds, &pts.player, StatCategory::Points, Side::Over).unwrap();
        assert_eq!(best.sportsbook, "FanDuel");

        let rows = build_play_rows(&report.plays);
        let pts_row = rows.iter().find(|r| r.stat == StatCategory::Points).unwrap();
        assert_eq!(pts_row.tier, "SOFT");
        assert_eq!(pts_row.player, "Nikola Jokic");
    }

    #[tokio::test]
    async fn test_report_serializes_to_json() {
        let tmp = tempfile::tempdir().unwrap();
        write_snapshot(tmp.path());
        let mut source = CsvSnapshotDir::new(tmp.path());
        let report = pipeline::run_from_source(&mut source, date(), &Config::default())
            .await
            .unwrap();

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["date"], "2025-01-15");
        assert_eq!(json["plays"][0]["stat"], "PTS");
        assert_eq!(json["plays"][0]["matchup"], "applied");
        assert!(json["rejected"][0]["reason"].is_string());
    }

    #[tokio::test]
    async fn test_allowed_amounts_centred_so_best_defense_lowers_projection() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("2025-01-15");
        fs::create_dir_all(&dir).unwrap();
        // Raw points allowed to centers: always positive, mean 24.03
        fs::write(
            dir.join("dvp.csv"),
            "team,position,stat,rank,opp_dvp_value\nLAC,C,PTS,WORST,28.0\nMIA,C,PTS,15,24.0\nBOS,C,PTS,BEST,20.1\n",
        )
        .unwrap();
        fs::write(
            dir.join("recent.csv"),
            "player,stat,games,average,mpg\nBam Adebayo,PTS,5,22,30\nNikola Jokic,PTS,5,22,30\n",
        )
        .unwrap();
        fs::write(
            dir.join("lineups.csv"),
            "player,team,opponent,position\nBam Adebayo,MIA,BOS,C\nNikola Jokic,DEN,LAC,C\n",
        )
        .unwrap();

        let mut source = CsvSnapshotDir::new(tmp.path());
        let report = pipeline::run_from_source(&mut source, date(), &Config::default())
            .await
            .unwrap();
        assert_eq!(report.skipped(), 0);

        let vs_best = report.plays.iter().find(|p| p.opponent == "BOS").unwrap();
        assert_eq!(vs_best.defense_rank.map(|r| r.ordinal()), Some(30));
        assert!(vs_best.favorability.unwrap() < 0.0);
        assert!(vs_best.blended_projection < 22.0, "got {}", vs_best.blended_projection);

        let vs_worst = report.plays.iter().find(|p| p.opponent == "LAC").unwrap();
        assert!(vs_worst.blended_projection > 22.0);
        assert_eq!(vs_worst.rank, 1);
        assert_eq!(vs_best.rank, 2);
    }
}
