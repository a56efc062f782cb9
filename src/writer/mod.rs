//! Segment file output.
//!
//! [`SqlDumpSink`] renders each segment into `{output_dir}/{NN_name}.sql`:
//! header, one `INSERT` per batch, footer. Files are written through a large
//! `BufWriter` and flushed when the segment closes.

use fixture_gen::render::{render_insert, segment_footer, segment_header};
use fixture_gen::{Row, RowSink, Segment};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

pub const WRITER_BUFFER_SIZE: usize = 256 * 1024;

/// Buffered writer for one segment file
pub struct SegmentWriter {
    writer: BufWriter<File>,
    statements: usize,
    bytes: u64,
}

impl SegmentWriter {
    pub fn new(filename: &Path) -> io::Result<Self> {
        let file = File::create(filename)?;
        let writer = BufWriter::with_capacity(WRITER_BUFFER_SIZE, file);

        Ok(Self {
            writer,
            statements: 0,
            bytes: 0,
        })
    }

    pub fn write_raw(&mut self, text: &str) -> io::Result<()> {
        self.writer.write_all(text.as_bytes())?;
        self.bytes += text.len() as u64;
        Ok(())
    }

    /// Write a statement, separated from the previous one by a blank line
    pub fn write_statement(&mut self, stmt: &str) -> io::Result<()> {
        if self.statements > 0 {
            self.write_raw("\n")?;
        }
        self.write_raw(stmt)?;
        self.statements += 1;
        Ok(())
    }

    pub fn statements(&self) -> usize {
        self.statements
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// A segment file that has been closed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    pub segment: Segment,
    pub path: PathBuf,
    pub rows: u64,
    pub bytes: u64,
}

/// Sink that writes every segment as a standalone MySQL file
pub struct SqlDumpSink {
    output_dir: PathBuf,
    seed: u64,
    current: Option<(Segment, SegmentWriter, u64)>,
    files: Vec<WrittenFile>,
}

impl SqlDumpSink {
    pub fn new(output_dir: PathBuf, seed: u64) -> Self {
        Self {
            output_dir,
            seed,
            current: None,
            files: Vec::new(),
        }
    }

    pub fn ensure_output_dir(&self) -> io::Result<()> {
        fs::create_dir_all(&self.output_dir)
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn segment_path(&self, segment: Segment) -> PathBuf {
        self.output_dir.join(format!("{}.sql", segment.file_stem()))
    }

    pub fn files(&self) -> &[WrittenFile] {
        &self.files
    }

    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(|f| f.bytes).sum()
    }

    fn writer_for(&mut self, segment: Segment) -> io::Result<(&mut SegmentWriter, &mut u64)> {
        match self.current.as_mut() {
            Some((open, writer, rows)) if *open == segment => Ok((writer, rows)),
            _ => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("segment {} is not open", segment),
            )),
        }
    }
}

impl RowSink for SqlDumpSink {
    fn begin_segment(&mut self, segment: Segment) -> io::Result<()> {
        if let Some((open, _, _)) = &self.current {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("cannot open {} while {} is still open", segment, open),
            ));
        }
        let mut writer = SegmentWriter::new(&self.segment_path(segment))?;
        writer.write_raw(&segment_header(segment, self.seed))?;
        self.current = Some((segment, writer, 0));
        Ok(())
    }

    fn append_batch(&mut self, segment: Segment, rows: &[Row]) -> io::Result<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let (writer, count) = self.writer_for(segment)?;
        writer.write_statement(&render_insert(segment.table(), rows))?;
        *count += rows.len() as u64;
        Ok(())
    }

    fn end_segment(&mut self, segment: Segment) -> io::Result<()> {
        self.writer_for(segment)?;
        let Some((segment, mut writer, rows)) = self.current.take() else {
            return Ok(());
        };
        writer.write_raw(segment_footer())?;
        writer.flush()?;
        self.files.push(WrittenFile {
            segment,
            path: self.segment_path(segment),
            rows,
            bytes: writer.bytes_written(),
        });
        Ok(())
    }
}
