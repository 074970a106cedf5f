pub mod server;

use secrecy::SecretString;

#[derive(Debug)]
pub enum Action {
    Server {
        port: u16,
        dsn: SecretString,
        session_ttl_minutes: i64,
        session_gc_seconds: u64,
    },
}
