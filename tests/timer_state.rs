#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use okulo::libs::breaks::{BreakChoice, BreakPolicy, FollowUp};
    use okulo::libs::timer::{StartOutcome, TimerMode, TimerState};

    fn t(secs: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap() + Duration::seconds(secs)
    }

    #[test]
    fn elapsed_is_derived_from_timestamps() {
        let mut state = TimerState::new();
        assert_eq!(state.start(t(0)), StartOutcome::Started);

        // Reads at arbitrary points never drift, no matter how often or
        // rarely the caller polls.
        assert_eq!(state.elapsed_secs(t(1)), 1);
        assert_eq!(state.elapsed_secs(t(1)), 1);
        assert_eq!(state.elapsed_secs(t(3600)), 3600);
        assert_eq!(state.elapsed_secs(t(2)), 2);
    }

    #[test]
    fn pause_and_resume_keep_the_total_exact() {
        let mut state = TimerState::new();
        state.start(t(0));
        assert!(state.pause(t(10)));
        assert_eq!(state.mode, TimerMode::Paused);

        // Time while paused does not count.
        assert_eq!(state.elapsed_secs(t(500)), 10);

        assert_eq!(state.start(t(100)), StartOutcome::Resumed);
        assert_eq!(state.elapsed_secs(t(110)), 20);
    }

    #[test]
    fn start_while_running_is_a_no_op() {
        let mut state = TimerState::new();
        state.start(t(0));
        assert_eq!(state.start(t(5)), StartOutcome::AlreadyRunning);
        // The anchor did not move.
        assert_eq!(state.elapsed_secs(t(10)), 10);
    }

    #[test]
    fn pause_when_not_running_reports_false() {
        let mut state = TimerState::new();
        assert!(!state.pause(t(0)));
        state.start(t(0));
        state.pause(t(5));
        assert!(!state.pause(t(6)));
    }

    #[test]
    fn backwards_clock_reads_clamp_to_zero() {
        let mut state = TimerState::new();
        state.start(t(100));
        assert_eq!(state.elapsed_secs(t(40)), 0);
    }

    #[test]
    fn reset_returns_the_session_totals() {
        let mut state = TimerState::new();
        state.start(t(0));
        let commit = state.reset(t(90)).unwrap();
        assert_eq!(commit.screen_secs, 90);
        assert_eq!(commit.overuse_secs, 0);
        assert_eq!(state.mode, TimerMode::Idle);
        assert_eq!(state.elapsed_secs(t(100)), 0);

        // Resetting an idle timer yields nothing to commit.
        assert!(state.reset(t(100)).is_none());
    }

    #[test]
    fn threshold_fires_exactly_on_the_boundary() {
        let policy = BreakPolicy::new(60);
        let mut state = TimerState::new();
        state.start(t(0));

        assert!(policy.check(&mut state, t(59)).is_none());
        let due = policy.check(&mut state, t(60)).unwrap();
        assert_eq!(due.prompt_at_secs, 60);
        assert_eq!(due.overuse_added, 0);

        // Already acknowledged; no second prompt within the interval.
        assert!(policy.check(&mut state, t(61)).is_none());
        assert!(policy.check(&mut state, t(119)).is_none());
    }

    #[test]
    fn catch_up_after_a_gap_yields_one_prompt() {
        let policy = BreakPolicy::new(60);
        let mut state = TimerState::new();
        state.start(t(0));

        // No checks ran for three intervals (suspended process); the
        // first check afterwards fires a single prompt at the newest
        // boundary.
        let due = policy.check(&mut state, t(185)).unwrap();
        assert_eq!(due.prompt_at_secs, 180);
        assert_eq!(due.elapsed_secs, 185);
        // First prompt of the session adds no overuse.
        assert_eq!(due.overuse_added, 0);
        assert!(policy.check(&mut state, t(186)).is_none());
    }

    #[test]
    fn ignored_prompts_accumulate_gap_overuse() {
        let policy = BreakPolicy::new(60);
        let mut state = TimerState::new();
        state.start(t(0));

        assert_eq!(policy.check(&mut state, t(60)).unwrap().overuse_added, 0);
        assert_eq!(policy.check(&mut state, t(120)).unwrap().overuse_added, 60);
        assert_eq!(policy.check(&mut state, t(180)).unwrap().overuse_added, 60);
        assert_eq!(state.overuse_secs, 120);
    }

    #[test]
    fn late_answer_counts_the_full_ignored_stretch() {
        // Prompt at 60, ignored through two more boundaries, answered
        // at 185: total overuse is 185 - 60 = 125.
        let policy = BreakPolicy::new(60);
        let mut state = TimerState::new();
        state.start(t(0));

        policy.check(&mut state, t(60));
        policy.check(&mut state, t(120));
        policy.check(&mut state, t(180));

        let resolution = policy.respond(&mut state, BreakChoice::CloseEyes, t(185));
        assert_eq!(resolution.commit.screen_secs, 185);
        assert_eq!(resolution.commit.overuse_secs, 125);
        assert_eq!(resolution.follow_up, FollowUp::Rest);
        assert_eq!(state.mode, TimerMode::Idle);
    }

    #[test]
    fn prompt_answered_promptly_records_no_overuse() {
        let policy = BreakPolicy::new(1800);
        let mut state = TimerState::new();
        state.start(t(0));

        policy.check(&mut state, t(1800));
        let resolution = policy.respond(&mut state, BreakChoice::EyeExercise, t(1800));
        assert_eq!(resolution.commit.screen_secs, 1800);
        assert_eq!(resolution.commit.overuse_secs, 0);
        assert_eq!(resolution.follow_up, FollowUp::Exercise);
    }

    #[test]
    fn skip_commits_and_restarts_at_zero() {
        let policy = BreakPolicy::new(60);
        let mut state = TimerState::new();
        state.start(t(0));
        policy.check(&mut state, t(60));

        let resolution = policy.respond(&mut state, BreakChoice::Skip, t(60));
        assert_eq!(resolution.follow_up, FollowUp::SkipAndRestart);
        assert_eq!(resolution.commit.screen_secs, 60);

        assert_eq!(state.mode, TimerMode::Running);
        assert_eq!(state.elapsed_secs(t(60)), 0);
        assert_eq!(state.last_prompt_secs, 0);
        // The next session prompts on its own schedule.
        assert!(policy.check(&mut state, t(119)).is_none());
        assert!(policy.check(&mut state, t(120)).is_some());
    }

    #[test]
    fn pause_stretches_the_wall_clock_threshold() {
        let policy = BreakPolicy::new(60);
        let mut state = TimerState::new();
        state.start(t(0));
        state.pause(t(30));
        state.start(t(1000));

        // 30s counted before the pause; the boundary lands 30 active
        // seconds after the resume.
        assert!(policy.check(&mut state, t(1029)).is_none());
        assert!(policy.check(&mut state, t(1030)).is_some());
    }
}
