use gomoku_arena::prelude::*;

/// Three built-in agents, two games per pairing.
///
/// Rules and evaluator settings are read from the environment (`BOARD_SIZE`,
/// `ACTION_TIMEOUT_MS`, `FIRST_PLAYER`, `ARENA_VERBOSE`, `ARENA_LOG`, `ARENA_CONCURRENCY`).
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let constraints = ConstraintsBuilder::from_env().build()?;
    let config = Configuration::from_env()?;

    let roster = vec![
        AgentHandle::new("simple-1", SimpleAgent::with_seed(1)),
        AgentHandle::new("simple-2", SimpleAgent::with_seed(2)),
        AgentHandle::new("simple-3", SimpleAgent::with_seed(3)),
    ];

    let evaluator = Evaluator::new(constraints, config);
    let report = evaluator
        .evaluate(roster, RoundRobinTournament::new(2))
        .await?;

    println!(
        "{} games on a {}x{} board",
        report.outcomes.len(),
        constraints.board_size(),
        constraints.board_size()
    );
    for outcome in &report.outcomes {
        println!(
            "{} vs {}: {} {}",
            outcome.black, outcome.white, outcome.result_code, outcome.reason
        );
    }
    println!();
    print!("{}", report.ranking);
    Ok(())
}
