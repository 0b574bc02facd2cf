//! Tabular snapshot files: one file per record kind, one record per line,
//! no header.

use chrono::{DateTime, Local};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use clustergraph_core::{Result, TabularRecord, TopologyError};

use crate::{MemberBatch, RecordSink};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H.%M.%S";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotPaths {
    pub queue_managers: PathBuf,
    pub links: PathBuf,
    pub queues: Option<PathBuf>,
}

impl SnapshotPaths {
    /// `prefix` is prepended verbatim, so it may carry a directory.
    pub fn new(prefix: &str, at: &DateTime<Local>, with_queues: bool) -> Self {
        let ts = at.format(TIMESTAMP_FORMAT);
        Self {
            queue_managers: PathBuf::from(format!("{}qmdata-{}.csv", prefix, ts)),
            links: PathBuf::from(format!("{}clusqmdata-{}.csv", prefix, ts)),
            queues: with_queues.then(|| PathBuf::from(format!("{}clusqueuedata-{}.csv", prefix, ts))),
        }
    }

    pub fn all(&self) -> Vec<&Path> {
        let mut paths = vec![self.queue_managers.as_path(), self.links.as_path()];
        if let Some(q) = &self.queues {
            paths.push(q.as_path());
        }
        paths
    }
}

/// Appends encoded records to the snapshot files as batches arrive.
pub struct SnapshotWriter {
    paths: SnapshotPaths,
    queue_managers: BufWriter<File>,
    links: BufWriter<File>,
    queues: Option<BufWriter<File>>,
    lines: usize,
}

impl SnapshotWriter {
    pub fn create(paths: SnapshotPaths) -> Result<Self> {
        let queue_managers = BufWriter::new(File::create(&paths.queue_managers)?);
        let links = BufWriter::new(File::create(&paths.links)?);
        let queues = match &paths.queues {
            Some(p) => Some(BufWriter::new(File::create(p)?)),
            None => None,
        };
        debug!("Opened snapshot files {:?}", paths.all());
        Ok(Self {
            paths,
            queue_managers,
            links,
            queues,
            lines: 0,
        })
    }

    pub fn paths(&self) -> &SnapshotPaths {
        &self.paths
    }

    pub fn lines_written(&self) -> usize {
        self.lines
    }
}

impl RecordSink for SnapshotWriter {
    fn accept(&mut self, batch: &MemberBatch) -> Result<()> {
        writeln!(self.queue_managers, "{}", batch.queue_manager.encode())?;
        self.lines += 1;
        for link in &batch.links {
            writeln!(self.links, "{}", link.encode())?;
            self.lines += 1;
        }
        if let Some(out) = self.queues.as_mut() {
            for queue in &batch.queues {
                writeln!(out, "{}", queue.encode())?;
                self.lines += 1;
            }
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.queue_managers.flush()?;
        self.links.flush()?;
        if let Some(out) = self.queues.as_mut() {
            out.flush()?;
        }
        info!("Wrote {} snapshot lines", self.lines);
        Ok(())
    }
}

/// Decodes every non-blank line of `path` and hands it to `f`. The first
/// malformed line aborts with its line number. Returns the record count.
pub fn for_each_record<T, F>(path: &Path, mut f: F) -> Result<usize>
where
    T: TabularRecord,
    F: FnMut(T) -> Result<()>,
{
    let file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => TopologyError::NotFound(path.to_path_buf()),
        _ => TopologyError::Io(e),
    })?;
    let mut count = 0;
    for (idx, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record = T::decode(&line).map_err(|source| TopologyError::Snapshot {
            path: path.to_path_buf(),
            line: idx + 1,
            source: Box::new(source),
        })?;
        f(record)?;
        count += 1;
    }
    debug!("Read {} {} records from {:?}", count, T::KIND, path);
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use clustergraph_core::{ClusterQueueRecord, QueueManagerRecord, RecordKind};

    #[test]
    fn file_names_carry_prefix_and_timestamp() {
        let at = Local.with_ymd_and_hms(2024, 3, 7, 9, 5, 1).unwrap();
        let paths = SnapshotPaths::new("site-", &at, false);
        assert_eq!(paths.queue_managers, PathBuf::from("site-qmdata-2024-03-07-09.05.01.csv"));
        assert_eq!(paths.links, PathBuf::from("site-clusqmdata-2024-03-07-09.05.01.csv"));
        assert!(paths.queues.is_none());

        let with_queues = SnapshotPaths::new("", &at, true);
        assert_eq!(
            with_queues.queues,
            Some(PathBuf::from("clusqueuedata-2024-03-07-09.05.01.csv"))
        );
        assert_eq!(with_queues.all().len(), 3);
    }

    #[test]
    fn writer_then_reader() {
        let dir = tempfile::TempDir::new().unwrap();
        let prefix = format!("{}/", dir.path().display());
        let paths = SnapshotPaths::new(&prefix, &Local::now(), true);
        let mut writer = SnapshotWriter::create(paths.clone()).unwrap();
        let batch = MemberBatch {
            queue_manager: QueueManagerRecord {
                tag: "PROD1".into(),
                name: "QM1".into(),
                command_level: 910,
                ..Default::default()
            },
            links: Vec::new(),
            queues: vec![ClusterQueueRecord {
                owner_name: "QM1".into(),
                queue_name: "APP.Q".into(),
                cluster_qmgr: "QM1".into(),
                rank: 2,
                ..Default::default()
            }],
        };
        writer.accept(&batch).unwrap();
        writer.finish().unwrap();
        assert_eq!(writer.lines_written(), 2);

        let mut qms = Vec::new();
        let n = for_each_record(&paths.queue_managers, |r: QueueManagerRecord| {
            qms.push(r);
            Ok(())
        })
        .unwrap();
        assert_eq!(n, 1);
        assert_eq!(qms[0], batch.queue_manager);

        let queues_path = paths.queues.unwrap();
        let n = for_each_record(&queues_path, |r: ClusterQueueRecord| {
            assert_eq!(r, batch.queues[0]);
            Ok(())
        })
        .unwrap();
        assert_eq!(n, 1);
        assert_eq!(std::fs::read_to_string(&paths.links).unwrap(), "");
    }

    #[test]
    fn malformed_line_reports_file_and_line() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("qm.csv");
        std::fs::write(&path, "T,QM1,ID,d,900,p,v\n\nT,QM2,ID,d,nine,p,v\n").unwrap();

        let err = for_each_record(&path, |_: QueueManagerRecord| Ok(())).unwrap_err();
        match &err {
            TopologyError::Snapshot { line, path: p, .. } => {
                assert_eq!(*line, 3);
                assert_eq!(p, &path);
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(matches!(
            err.root(),
            TopologyError::RecordFormat {
                kind: RecordKind::QueueManager,
                ..
            }
        ));
    }

    #[test]
    fn missing_snapshot_is_not_found() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = for_each_record(&dir.path().join("absent.csv"), |_: QueueManagerRecord| Ok(()))
            .unwrap_err();
        assert!(matches!(err, TopologyError::NotFound(_)));
    }
}
