// Miner Stats - Free and Open Source Software Statement
//
// This project, miner-stats, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/store/schema.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// Table definitions for the statistics store. `algorithm` and `pool` are
// filled by the pool statistics collector; everything else is written here.

pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS miner (
    id   INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS mining_software (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    name            TEXT NOT NULL UNIQUE,
    website         TEXT NOT NULL DEFAULT '',
    algo_param      TEXT NOT NULL DEFAULT '',
    pool_param      TEXT NOT NULL DEFAULT '',
    wallet_param    TEXT NOT NULL DEFAULT '',
    password_param  TEXT NOT NULL DEFAULT '',
    file_param      TEXT NOT NULL DEFAULT '',
    benchmark_param TEXT NOT NULL DEFAULT '',
    other_params    TEXT NOT NULL DEFAULT '',
    skip_lines      INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS algorithm (
    id   INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS pool (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    host         TEXT NOT NULL,
    port         INTEGER NOT NULL,
    algorithm_id INTEGER NOT NULL REFERENCES algorithm (id)
);

CREATE TABLE IF NOT EXISTS mining_software_algorithm (
    id                 INTEGER PRIMARY KEY AUTOINCREMENT,
    mining_software_id INTEGER NOT NULL REFERENCES mining_software (id),
    algorithm_id       INTEGER NOT NULL REFERENCES algorithm (id),
    name               TEXT NOT NULL,
    extra_params       TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS miner_mining_software (
    id                 INTEGER PRIMARY KEY AUTOINCREMENT,
    miner_id           INTEGER NOT NULL REFERENCES miner (id),
    mining_software_id INTEGER NOT NULL REFERENCES mining_software (id),
    file_path          TEXT NOT NULL,
    UNIQUE (miner_id, mining_software_id)
);

CREATE TABLE IF NOT EXISTS mining_statistic (
    id                 INTEGER PRIMARY KEY AUTOINCREMENT,
    algorithm_id       INTEGER NOT NULL REFERENCES algorithm (id),
    miner_id           INTEGER NOT NULL REFERENCES miner (id),
    mining_software_id INTEGER NOT NULL REFERENCES mining_software (id),
    work_per_second    REAL NOT NULL,
    mh_factor          REAL NOT NULL CHECK (mh_factor > 0),
    instant            TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_pool_algorithm ON pool (algorithm_id);
CREATE INDEX IF NOT EXISTS idx_bridge_software ON mining_software_algorithm (mining_software_id);
"#;
