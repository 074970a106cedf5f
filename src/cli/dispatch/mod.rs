use crate::cli::actions::Action;
use anyhow::Result;
use secrecy::SecretString;

pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    Ok(Action::Server {
        port: matches.get_one::<u16>("port").copied().unwrap_or(3003),
        dsn: matches
            .get_one("dsn")
            .map(|s: &String| SecretString::from(s.to_string()))
            .ok_or_else(|| anyhow::anyhow!("missing required argument: --dsn"))?,
        session_ttl_minutes: matches
            .get_one::<i64>("session-ttl-minutes")
            .copied()
            .unwrap_or(30),
        session_gc_seconds: matches
            .get_one::<u64>("session-gc-seconds")
            .copied()
            .unwrap_or(300),
    })
}
