// Miner Stats - Free and Open Source Software Statement
//
// This project, miner-stats, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/store/reference.rs
// Version: 1.0.3
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file keeps the reference tables in step with the configuration: the
// miner row, one row per mining program, the bridge rows mapping a program's
// algorithm names onto pool algorithms, and per-miner install paths. It also
// answers the two questions the benchmark driver asks of the pool data: which
// algorithms are worth measuring, and where to point a program that must
// connect to a pool.
//
// Tree Location:
// - src/store/reference.rs (reference synchronizer, algorithm and pool selection)
// - Depends on: rusqlite, config, core::types

use super::Store;
use crate::config::{AlgoConfig, SoftwareConfig};
use crate::core::types::{
    Algorithm, Miner, MinerMiningSoftware, MiningSoftware, MiningSoftwareAlgorithm, Pool,
};
use crate::error::StatsError;
use crate::Result;
use log::{debug, info};
use rusqlite::{OptionalExtension, Row, params};

const LOG_TARGET: &str = "miner_stats::store::reference";

const SOFTWARE_COLUMNS: &str = "id, name, website, algo_param, pool_param, wallet_param, \
     password_param, file_param, benchmark_param, other_params, skip_lines";

const BRIDGE_COLUMNS: &str =
    "msa.id, msa.mining_software_id, msa.algorithm_id, msa.name, msa.extra_params";

fn software_from_row(row: &Row<'_>) -> rusqlite::Result<MiningSoftware> {
    Ok(MiningSoftware {
        id: row.get(0)?,
        name: row.get(1)?,
        website: row.get(2)?,
        algo_param: row.get(3)?,
        pool_param: row.get(4)?,
        wallet_param: row.get(5)?,
        password_param: row.get(6)?,
        file_param: row.get(7)?,
        benchmark_param: row.get(8)?,
        other_params: row.get(9)?,
        skip_lines: row.get(10)?,
    })
}

fn bridge_from_row(row: &Row<'_>) -> rusqlite::Result<MiningSoftwareAlgorithm> {
    Ok(MiningSoftwareAlgorithm {
        id: row.get(0)?,
        mining_software_id: row.get(1)?,
        algorithm_id: row.get(2)?,
        name: row.get(3)?,
        extra_params: row.get(4)?,
    })
}

impl Store {
    /// Find the miner by exact name, creating it on first run
    pub fn ensure_miner(&self, name: &str) -> Result<Miner> {
        let tx = self.conn().unchecked_transaction()?;
        let existing: Option<i64> = tx
            .query_row("SELECT id FROM miner WHERE name = ?1", [name], |row| row.get(0))
            .optional()?;

        let id = match existing {
            Some(id) => {
                info!(target: LOG_TARGET, "Found existing miner {}", name);
                id
            }
            None => {
                info!(target: LOG_TARGET, "Creating miner {}...", name);
                tx.execute("INSERT INTO miner (name) VALUES (?1)", [name])
                    .map_err(|e| StatsError::write_failed(format!("miner {}", name), e))?;
                tx.last_insert_rowid()
            }
        };
        tx.commit()?;

        Ok(Miner {
            id,
            name: name.to_string(),
        })
    }

    pub fn find_software(&self, name: &str) -> Result<Option<MiningSoftware>> {
        let sql = format!("SELECT {} FROM mining_software WHERE name = ?1", SOFTWARE_COLUMNS);
        Ok(self
            .conn()
            .query_row(&sql, [name], software_from_row)
            .optional()?)
    }

    /// Insert or overwrite the software row; the configuration is authoritative
    pub fn upsert_software(&self, cfg: &SoftwareConfig) -> Result<MiningSoftware> {
        let tx = self.conn().unchecked_transaction()?;
        let existing: Option<i64> = tx
            .query_row("SELECT id FROM mining_software WHERE name = ?1", [&cfg.name], |row| {
                row.get(0)
            })
            .optional()?;

        let id = match existing {
            Some(id) => {
                debug!(target: LOG_TARGET, "Updating mining software {} (id {})", cfg.name, id);
                tx.execute(
                    "UPDATE mining_software SET website = ?2, algo_param = ?3, \
                     pool_param = ?4, wallet_param = ?5, password_param = ?6, \
                     file_param = ?7, benchmark_param = ?8, other_params = ?9, \
                     skip_lines = ?10 WHERE id = ?1",
                    params![
                        id,
                        cfg.release_website,
                        cfg.algo_param,
                        cfg.pool_param,
                        cfg.wallet_param,
                        cfg.password_param,
                        cfg.file_param,
                        cfg.benchmark_param,
                        cfg.other_params,
                        cfg.skip_lines,
                    ],
                )
                .map_err(|e| StatsError::write_failed(format!("mining software {}", cfg.name), e))?;
                id
            }
            None => {
                info!(target: LOG_TARGET, "Creating mining software record for {}...", cfg.name);
                tx.execute(
                    "INSERT INTO mining_software (name, website, algo_param, pool_param, \
                     wallet_param, password_param, file_param, benchmark_param, other_params, \
                     skip_lines) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                    params![
                        cfg.name,
                        cfg.release_website,
                        cfg.algo_param,
                        cfg.pool_param,
                        cfg.wallet_param,
                        cfg.password_param,
                        cfg.file_param,
                        cfg.benchmark_param,
                        cfg.other_params,
                        cfg.skip_lines,
                    ],
                )
                .map_err(|e| StatsError::write_failed(format!("mining software {}", cfg.name), e))?;
                tx.last_insert_rowid()
            }
        };
        tx.commit()?;

        Ok(MiningSoftware {
            id,
            name: cfg.name.clone(),
            website: cfg.release_website.clone(),
            algo_param: cfg.algo_param.clone(),
            pool_param: cfg.pool_param.clone(),
            wallet_param: cfg.wallet_param.clone(),
            password_param: cfg.password_param.clone(),
            file_param: cfg.file_param.clone(),
            benchmark_param: cfg.benchmark_param.clone(),
            other_params: cfg.other_params.clone(),
            skip_lines: cfg.skip_lines,
        })
    }

    pub fn has_algorithms(&self) -> Result<bool> {
        let found: Option<i64> = self
            .conn()
            .query_row("SELECT id FROM algorithm LIMIT 1", [], |row| row.get(0))
            .optional()?;
        Ok(found.is_some())
    }

    /// Fail with an actionable message when the pool collector has not run yet
    pub fn ensure_algorithms_loaded(&self) -> Result<()> {
        if self.has_algorithms()? {
            Ok(())
        } else {
            Err(StatsError::ReferenceDataMissing)
        }
    }

    /// Case-insensitive lookup in the algorithm table. Names are folded in
    /// Rust on both sides since SQLite's LOWER() only folds ASCII.
    pub fn find_algorithm(&self, name: &str) -> Result<Option<Algorithm>> {
        let wanted = name.to_lowercase();
        let mut stmt = self.conn().prepare("SELECT id, name FROM algorithm ORDER BY id")?;
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let candidate: String = row.get(1)?;
            if candidate.to_lowercase() == wanted {
                return Ok(Some(Algorithm {
                    id: row.get(0)?,
                    name: candidate,
                }));
            }
        }
        Ok(None)
    }

    /// Map each configured algorithm onto the algorithm table. Algorithms no
    /// pool knows about are skipped; they may appear after the next pool
    /// collection. Returns the number of bridges written.
    pub fn sync_algorithm_bridges(&self, software_id: i64, algos: &[AlgoConfig]) -> Result<usize> {
        let mut written = 0;
        for algo in algos {
            let lookup = algo.lookup_name();
            let Some(algorithm) = self.find_algorithm(lookup)? else {
                debug!(target: LOG_TARGET,
                    "No pool algorithm named {}; skipping {}",
                    lookup, algo.miner_name
                );
                continue;
            };

            let what = format!("miner software algo map for {}", algo.miner_name);
            let tx = self.conn().unchecked_transaction()?;
            let updated = tx
                .execute(
                    "UPDATE mining_software_algorithm SET name = ?3, extra_params = ?4 \
                     WHERE mining_software_id = ?1 AND algorithm_id = ?2",
                    params![software_id, algorithm.id, algo.miner_name, algo.extra_params],
                )
                .map_err(|e| StatsError::write_failed(what.as_str(), e))?;
            if updated == 0 {
                tx.execute(
                    "INSERT INTO mining_software_algorithm \
                     (mining_software_id, algorithm_id, name, extra_params) \
                     VALUES (?1, ?2, ?3, ?4)",
                    params![software_id, algorithm.id, algo.miner_name, algo.extra_params],
                )
                .map_err(|e| StatsError::write_failed(what.as_str(), e))?;
                debug!(target: LOG_TARGET, "Mapped {} -> {}", algo.miner_name, algorithm.name);
            }
            tx.commit()?;
            written += 1;
        }
        Ok(written)
    }

    /// Full reference synchronisation for one software block. The software
    /// row is committed before the algorithm table check so it survives a
    /// `ReferenceDataMissing` failure.
    pub fn sync_software(&self, cfg: &SoftwareConfig) -> Result<MiningSoftware> {
        let software = self.upsert_software(cfg)?;
        self.ensure_algorithms_loaded()?;
        let mapped = self.sync_algorithm_bridges(software.id, &cfg.algo)?;
        info!(target: LOG_TARGET,
            "🔗 {}: {} of {} algorithms mapped to pool algorithms",
            software.name, mapped, cfg.algo.len()
        );
        Ok(software)
    }

    pub fn bridges_for(&self, software_id: i64) -> Result<Vec<MiningSoftwareAlgorithm>> {
        let sql = format!(
            "SELECT {} FROM mining_software_algorithm msa \
             WHERE msa.mining_software_id = ?1 ORDER BY msa.id",
            BRIDGE_COLUMNS
        );
        let mut stmt = self.conn().prepare(&sql)?;
        let rows = stmt
            .query_map([software_id], bridge_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Bridge rows for the software whose algorithm is served by at least one
    /// pool, in alphabetical order of the program's algorithm name.
    ///
    /// The sort key is the bridge row's miner-side name, not the pool-side
    /// algorithm name: a program calling `zeta` "aaa" runs before one mapped
    /// as `alpha` -> "zzz". Existing benchmark histories follow this order.
    pub fn benchmark_algorithms(&self, software_id: i64) -> Result<Vec<MiningSoftwareAlgorithm>> {
        let sql = format!(
            "SELECT DISTINCT {} FROM mining_software_algorithm msa \
             WHERE msa.mining_software_id = ?1 \
               AND EXISTS (SELECT 1 FROM pool p WHERE p.algorithm_id = msa.algorithm_id) \
             ORDER BY msa.name, msa.id",
            BRIDGE_COLUMNS
        );
        let mut stmt = self.conn().prepare(&sql)?;
        let rows = stmt
            .query_map([software_id], bridge_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    pub fn select_pool(&self, algorithm_id: i64) -> Result<Option<Pool>> {
        Ok(self
            .conn()
            .query_row(
                "SELECT id, host, port, algorithm_id FROM pool \
                 WHERE algorithm_id = ?1 ORDER BY id LIMIT 1",
                [algorithm_id],
                |row| {
                    Ok(Pool {
                        id: row.get(0)?,
                        host: row.get(1)?,
                        port: row.get(2)?,
                        algorithm_id: row.get(3)?,
                    })
                },
            )
            .optional()?)
    }

    /// `stratum+tcp://host:port` of any pool serving the algorithm
    pub fn select_pool_url(&self, algorithm_id: i64) -> Result<String> {
        match self.select_pool(algorithm_id)? {
            Some(pool) => Ok(pool.stratum_url()),
            None => {
                let algorithm: Option<String> = self
                    .conn()
                    .query_row("SELECT name FROM algorithm WHERE id = ?1", [algorithm_id], |row| {
                        row.get(0)
                    })
                    .optional()?;
                Err(StatsError::NoPoolForAlgorithm {
                    algorithm: algorithm.unwrap_or_else(|| format!("#{}", algorithm_id)),
                })
            }
        }
    }

    /// Remember where the program lives on this miner
    pub fn record_install_path(&self, miner_id: i64, software_id: i64, path: &str) -> Result<()> {
        let tx = self.conn().unchecked_transaction()?;
        tx.execute(
            "INSERT INTO miner_mining_software (miner_id, mining_software_id, file_path) \
             VALUES (?1, ?2, ?3) \
             ON CONFLICT (miner_id, mining_software_id) \
             DO UPDATE SET file_path = excluded.file_path",
            params![miner_id, software_id, path],
        )
        .map_err(|e| StatsError::write_failed(format!("install path {}", path), e))?;
        tx.commit()?;
        Ok(())
    }

    pub fn install_path(
        &self,
        miner_id: i64,
        software_id: i64,
    ) -> Result<Option<MinerMiningSoftware>> {
        Ok(self
            .conn()
            .query_row(
                "SELECT id, miner_id, mining_software_id, file_path FROM miner_mining_software \
                 WHERE miner_id = ?1 AND mining_software_id = ?2",
                [miner_id, software_id],
                |row| {
                    Ok(MinerMiningSoftware {
                        id: row.get(0)?,
                        miner_id: row.get(1)?,
                        mining_software_id: row.get(2)?,
                        file_path: row.get(3)?,
                    })
                },
            )
            .optional()?)
    }

    /// Used by the pool collector and by tests; the driver only reads algorithms.
    pub fn insert_algorithm(&self, name: &str) -> Result<i64> {
        self.conn()
            .execute("INSERT INTO algorithm (name) VALUES (?1)", [name])
            .map_err(|e| StatsError::write_failed(format!("algorithm {}", name), e))?;
        Ok(self.conn().last_insert_rowid())
    }

    /// Used by the pool collector and by tests; the driver only reads pools.
    pub fn insert_pool(&self, host: &str, port: u16, algorithm_id: i64) -> Result<i64> {
        self.conn()
            .execute(
                "INSERT INTO pool (host, port, algorithm_id) VALUES (?1, ?2, ?3)",
                params![host, port, algorithm_id],
            )
            .map_err(|e| StatsError::write_failed(format!("pool {}:{}", host, port), e))?;
        Ok(self.conn().last_insert_rowid())
    }
}


// Changelog:
// - v1.0.3 (2025-07-08): Algorithm lookup folds case in Rust so non-ASCII
//   names match regardless of case.
// - v1.0.2 (2025-07-06): Committed the software row ahead of the algorithm check.
//   - A missing algorithm table no longer discards the software record.
// - v1.0.1 (2025-07-04): Case-insensitive algorithm lookup.
// - v1.0.0 (2025-07-02): Initial reference synchronizer.
