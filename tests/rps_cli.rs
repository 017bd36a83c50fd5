mod support;

use predicates::str::contains;

use support::TestData;

#[test]
fn rock_beats_scissors_five_times() -> Result<(), Box<dyn std::error::Error>> {
    let data = TestData::init()?;

    for round in 1..=5 {
        let report = data.json(&["rps", "play", "rock", "--against", "scissors"]);
        assert_eq!(report["round"]["outcome"], "Win");
        assert_eq!(report["player_score"], round);
        assert_eq!(report["computer_score"], 0);
    }

    let scoreboard = data.json(&["rps", "score"]);
    assert_eq!(scoreboard["player_score"], 5);
    assert_eq!(scoreboard["computer_score"], 0);
    assert_eq!(scoreboard["high_score"], 5);
    assert_eq!(scoreboard["statistics"]["best_streak"], 5);
    assert_eq!(scoreboard["statistics"]["most_picked"], "Rock");

    assert_eq!(data.read_file("rps_high_score.txt")?.trim(), "5");

    Ok(())
}

#[test]
fn human_output_shows_headline() -> Result<(), Box<dyn std::error::Error>> {
    let data = TestData::init()?;

    data.cmd()
        .args(["rps", "play", "paper", "--against", "paper"])
        .assert()
        .success()
        .stdout(contains("It's a Tie!"))
        .stdout(contains("Player: 0 | Computer: 0"));

    data.cmd()
        .args(["rps", "play", "s", "--against", "rock"])
        .assert()
        .success()
        .stdout(contains("Computer Wins!"));

    Ok(())
}

#[test]
fn reset_keeps_high_score() -> Result<(), Box<dyn std::error::Error>> {
    let data = TestData::init()?;

    data.json(&["rps", "play", "paper", "--against", "rock"]);
    data.json(&["rps", "play", "paper", "--against", "rock"]);

    let reset = data.json(&["rps", "reset"]);
    assert_eq!(reset["high_score"], 2);

    let scoreboard = data.json(&["rps", "score"]);
    assert_eq!(scoreboard["player_score"], 0);
    assert_eq!(scoreboard["statistics"]["rounds_played"], 0);
    assert_eq!(scoreboard["high_score"], 2);

    let report = data.json(&["rps", "play", "paper", "--against", "rock"]);
    assert_eq!(report["new_high_score"], false);

    Ok(())
}

#[test]
fn history_is_capped_by_config() -> Result<(), Box<dyn std::error::Error>> {
    let data = TestData::init()?;
    data.write_config("[rps]\nhistory_cap = 2\n")?;

    for _ in 0..4 {
        data.json(&["rps", "play", "rock", "--against", "paper"]);
    }

    let scoreboard = data.json(&["rps", "score"]);
    assert_eq!(scoreboard["history"].as_array().map(Vec::len), Some(2));
    assert_eq!(scoreboard["statistics"]["rounds_played"], 4);
    assert_eq!(scoreboard["computer_score"], 4);

    Ok(())
}

#[test]
fn random_computer_choice_is_valid() -> Result<(), Box<dyn std::error::Error>> {
    let data = TestData::init()?;

    let report = data.json(&["rps", "play", "rock"]);
    let computer = report["round"]["computer"].as_str().unwrap_or_default();
    assert!(["Rock", "Paper", "Scissors"].contains(&computer));

    Ok(())
}

#[test]
fn invalid_choice_is_user_error() -> Result<(), Box<dyn std::error::Error>> {
    let data = TestData::init()?;

    data.cmd()
        .args(["rps", "play", "lizard"])
        .assert()
        .code(2)
        .stderr(contains("invalid choice 'lizard'"));

    assert!(!data.file("rps_statistics.json").exists());

    Ok(())
}

#[test]
fn older_log_line_history_still_loads() -> Result<(), Box<dyn std::error::Error>> {
    let data = TestData::init()?;
    data.write_file(
        "rps_statistics.json",
        r#"{"rounds_played": 2, "game_history": ["09:00:00 - Rock vs Scissors: Win\n", "09:00:05 - Rock vs Paper: Loss\n"]}"#,
    )?;

    let scoreboard = data.json(&["rps", "score"]);
    assert_eq!(scoreboard["history"].as_array().map(Vec::len), Some(2));
    assert_eq!(scoreboard["statistics"]["rounds_played"], 2);
    assert_eq!(scoreboard["statistics"]["most_picked"], "Rock");

    let report = data.json(&["rps", "play", "rock", "--against", "scissors"]);
    assert_eq!(report["statistics"]["rounds_played"], 3);
    assert_eq!(report["round"]["outcome"], "Win");

    Ok(())
}
