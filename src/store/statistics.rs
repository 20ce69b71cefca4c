// Miner Stats - Free and Open Source Software Statement
//
// This project, miner-stats, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/store/statistics.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// Measurement writer. Rows are append-only and each insert is its own
// transaction, so measurements from earlier algorithms survive a later failure.

use super::Store;
use crate::core::types::{MiningStatistic, NewMiningStatistic};
use crate::error::StatsError;
use crate::Result;
use log::debug;
use rusqlite::params;

const LOG_TARGET: &str = "miner_stats::store::statistics";

impl Store {
    pub fn insert_statistic(&self, stat: &NewMiningStatistic) -> Result<i64> {
        let tx = self.conn().unchecked_transaction()?;
        tx.execute(
            "INSERT INTO mining_statistic \
             (algorithm_id, miner_id, mining_software_id, work_per_second, mh_factor, instant) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                stat.algorithm_id,
                stat.miner_id,
                stat.mining_software_id,
                stat.work_per_second,
                stat.mh_factor,
                stat.instant,
            ],
        )
        .map_err(|e| {
            let what = format!("miner statistic for algorithm {}", stat.algorithm_id);
            StatsError::write_failed(what, e)
        })?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        debug!(target: LOG_TARGET, "Stored statistic {}", id);
        Ok(id)
    }

    /// All measurements of one program on one miner, oldest first
    pub fn statistics_for(&self, miner_id: i64, software_id: i64) -> Result<Vec<MiningStatistic>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, algorithm_id, miner_id, mining_software_id, work_per_second, \
             mh_factor, instant FROM mining_statistic \
             WHERE miner_id = ?1 AND mining_software_id = ?2 ORDER BY id",
        )?;
        let rows = stmt
            .query_map([miner_id, software_id], |row| {
                Ok(MiningStatistic {
                    id: row.get(0)?,
                    algorithm_id: row.get(1)?,
                    miner_id: row.get(2)?,
                    mining_software_id: row.get(3)?,
                    work_per_second: row.get(4)?,
                    mh_factor: row.get(5)?,
                    instant: row.get(6)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    pub fn statistic_count(&self) -> Result<u64> {
        let count: i64 = self
            .conn()
            .query_row("SELECT COUNT(*) FROM mining_statistic", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SoftwareConfig;
    use chrono::Utc;

    fn seeded() -> (Store, NewMiningStatistic) {
        let store = Store::open_in_memory().unwrap();
        let algorithm_id = store.insert_algorithm("scrypt").unwrap();
        let miner = store.ensure_miner("rig-01").unwrap();
        let software = store
            .upsert_software(&SoftwareConfig {
                name: "cpuminer-opt".to_string(),
                algo_param: "-a".to_string(),
                ..Default::default()
            })
            .unwrap();
        let stat = NewMiningStatistic {
            algorithm_id,
            miner_id: miner.id,
            mining_software_id: software.id,
            work_per_second: 45.9,
            mh_factor: 0.000_001,
            instant: Utc::now(),
        };
        (store, stat)
    }

    #[test]
    fn test_insert_and_read_back() {
        let (store, stat) = seeded();
        store.insert_statistic(&stat).unwrap();
        store.insert_statistic(&stat).unwrap();

        let rows = store.statistics_for(stat.miner_id, stat.mining_software_id).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].work_per_second, 45.9);
        assert_eq!(rows[0].mh_factor, 0.000_001);
        assert_eq!(rows[0].instant, stat.instant);
        assert!((rows[0].megahashes() - 0.0000459).abs() < 1e-12);
        assert_eq!(store.statistic_count().unwrap(), 2);
    }

    #[test]
    fn test_non_positive_factor_rejected() {
        let (store, mut stat) = seeded();
        stat.mh_factor = 0.0;
        let err = store.insert_statistic(&stat).unwrap_err();
        assert!(matches!(err, StatsError::WriteFailed { .. }));
        assert_eq!(store.statistic_count().unwrap(), 0);
    }

    #[test]
    fn test_unknown_algorithm_rejected() {
        let (store, mut stat) = seeded();
        stat.algorithm_id = 999;
        assert!(matches!(store.insert_statistic(&stat), Err(StatsError::WriteFailed { .. })));
    }
}
