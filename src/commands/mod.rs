//! Discord bot commands.
//!
//! Every command except `nsec_stat` forwards to the main node through
//! [`crate::dispatch::relay`].

pub mod answer;
pub mod froge;
pub mod gif;
pub mod go;
pub mod hello;
pub mod http;
pub mod java;
pub mod leaderboard;
pub mod level;
pub mod nsec_stat;

pub use answer::answer;
pub use froge::froge;
pub use gif::gif;
pub use go::go;
pub use hello::hello;
pub use http::http;
pub use java::java;
pub use leaderboard::leaderboard;
pub use level::level;
pub use nsec_stat::nsec_stat;

use crate::types::{Data, Error};

/// All slash commands, in registration order.
pub fn all() -> Vec<poise::Command<Data, Error>> {
    vec![
        go(),
        hello(),
        leaderboard(),
        answer(),
        gif(),
        java(),
        froge(),
        level(),
        http(),
        nsec_stat(),
    ]
}
