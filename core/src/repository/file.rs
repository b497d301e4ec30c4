use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::default_data_dir;
use crate::model::series::{DailySeries, SeriesKind, SeriesLookup};
use crate::repository::traits::HistoricalSeriesProvider;

/// One row of the vendor's `Date,Value` CSV layout.
#[derive(Serialize, Deserialize)]
struct SeriesRow {
    #[serde(rename = "Date", alias = "date")]
    date: NaiveDate,
    #[serde(rename = "Value", alias = "value")]
    value: f64,
}

/// Parses a `Date,Value` CSV body. Row order does not matter.
pub fn read_series_csv<R: Read>(kind: SeriesKind, reader: R) -> Result<DailySeries> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut series = DailySeries::new(kind);
    for (i, row) in csv_reader.deserialize::<SeriesRow>().enumerate() {
        // +2: one for the header, one for 1-based line numbers
        let row = row.with_context(|| format!("Malformed {} CSV at line {}", kind, i + 2))?;
        series.insert(row.date, row.value)?;
    }
    Ok(series)
}

/// Writes a series oldest-first in the same layout `read_series_csv` accepts.
pub fn write_series_csv<W: Write>(series: &DailySeries, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for (date, value) in series.sorted_points() {
        csv_writer.serialize(SeriesRow { date, value })?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Series cached as CSV files in a local data directory.
#[derive(Clone)]
pub struct FileSeriesProvider {
    data_dir: PathBuf,
}

impl FileSeriesProvider {
    pub fn new(base_dir: Option<PathBuf>) -> Result<Self> {
        let data_dir = match base_dir {
            Some(dir) => dir,
            None => default_data_dir()?,
        };
        fs::create_dir_all(&data_dir)
            .with_context(|| format!("Could not create data directory {}", data_dir.display()))?;
        Ok(FileSeriesProvider { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn series_path(&self, kind: SeriesKind) -> PathBuf {
        self.data_dir.join(kind.file_name())
    }

    /// Replaces the cached file for `series.kind()`. The new content is
    /// written next to the old file and renamed over it, so a failed write
    /// leaves the previous cache intact.
    pub fn store(&self, series: &DailySeries) -> Result<PathBuf> {
        let mut paths = self.store_all(std::slice::from_ref(series))?;
        paths.pop().ok_or_else(|| anyhow!("Nothing stored for {}", series.kind()))
    }

    /// Replaces several cached files together. Every temp file is written
    /// before any rename, so a failed write leaves all previous files in
    /// place.
    pub fn store_all(&self, series: &[DailySeries]) -> Result<Vec<PathBuf>> {
        let mut staged: Vec<(PathBuf, PathBuf)> = Vec::with_capacity(series.len());
        for s in series {
            let path = self.series_path(s.kind());
            let tmp_path = path.with_extension("csv.tmp");
            if let Err(e) = write_tmp(s, &tmp_path) {
                for (tmp, _) in &staged {
                    let _ = fs::remove_file(tmp);
                }
                return Err(e);
            }
            staged.push((tmp_path, path));
        }

        let mut paths = Vec::with_capacity(staged.len());
        for (tmp_path, path) in staged {
            fs::rename(&tmp_path, &path)
                .with_context(|| format!("Could not replace {}", path.display()))?;
            paths.push(path);
        }
        Ok(paths)
    }
}

fn write_tmp(series: &DailySeries, tmp_path: &Path) -> Result<()> {
    let file = File::create(tmp_path)
        .with_context(|| format!("Could not create {}", tmp_path.display()))?;
    let mut writer = BufWriter::new(file);
    write_series_csv(series, &mut writer)?;
    writer.flush()?;
    Ok(())
}

impl HistoricalSeriesProvider for FileSeriesProvider {
    fn get_series(&self, kind: SeriesKind) -> Result<DailySeries> {
        let path = self.series_path(kind);
        if !path.exists() {
            return Err(anyhow!(
                "No {} data at {}. Run `minesim fetch` first.",
                kind,
                path.display()
            ));
        }
        let file = File::open(&path).with_context(|| format!("Could not open {}", path.display()))?;
        let series = read_series_csv(kind, BufReader::new(file))
            .with_context(|| format!("Could not load {}", path.display()))?;
        info!(
            kind = %series.kind(),
            points = series.len(),
            earliest = ?series.earliest(),
            latest = ?series.latest(),
            "Loaded series from cache"
        );
        Ok(series)
    }
}
