use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use crate::model::{Error, Result};

const LINE_WIDTH: usize = 60;

pub struct FastaRecord {
    name: String,
    sequence: String,
}

impl FastaRecord {
    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_sequence(&self) -> &str {
        &self.sequence
    }

    pub fn into_sequence(self) -> String {
        self.sequence
    }
}

// Reads headers (`>name`), skips `;` comment lines and blank lines, and
// joins multi-line sequences. Data before the first header is ignored.
pub fn read_fasta<R: BufRead>(reader: R) -> Result<Vec<FastaRecord>> {
    let mut records: Vec<FastaRecord> = Vec::new();

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();

        if line.is_empty() || line.starts_with(';') {
            continue;
        }

        if let Some(name) = line.strip_prefix('>') {
            records.push(FastaRecord {
                name: name.trim().to_string(),
                sequence: String::new(),
            });
        } else if let Some(record) = records.last_mut() {
            record.sequence.push_str(line);
        }
    }

    Ok(records)
}

pub fn read_fasta_file(path: &Path) -> Result<Vec<FastaRecord>> {
    read_fasta(BufReader::new(File::open(path)?))
}

pub fn read_single_record(path: &Path) -> Result<FastaRecord> {
    let mut records = read_fasta_file(path)?;

    if records.is_empty() {
        return Err(Error::EmptyFasta(path.display().to_string()));
    }

    Ok(records.remove(0))
}

pub struct FastaWriter<W: Write> {
    writer: W,
}

impl<W: Write> FastaWriter<W> {
    pub fn new(writer: W) -> FastaWriter<W> {
        FastaWriter { writer }
    }

    pub fn write_record(&mut self, name: &str, sequence: &str) -> std::io::Result<()> {
        writeln!(self.writer, ">{}", name)?;

        for chunk in sequence.as_bytes().chunks(LINE_WIDTH) {
            self.writer.write_all(chunk)?;
            self.writer.write_all(b"\n")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_multi_record_input() {
        let input = b"; comment line\n>genome1\nACGT\nacgt\n\n>genome2 extra\nTTTT\n";
        let records = read_fasta(&input[..]).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get_name(), "genome1");
        assert_eq!(records[0].get_sequence(), "ACGTacgt");
        assert_eq!(records[1].get_name(), "genome2 extra");
        assert_eq!(records[1].get_sequence(), "TTTT");
    }

    #[test]
    fn test_read_ignores_data_before_first_header() {
        let records = read_fasta(&b"ACGT\n>genome\nTT\n"[..]).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get_sequence(), "TT");
    }

    #[test]
    fn test_read_empty_input() {
        assert!(read_fasta(&b""[..]).unwrap().is_empty());
    }

    #[test]
    fn test_writer_wraps_long_sequences() {
        let sequence = "A".repeat(130);

        let mut output = Vec::new();
        FastaWriter::new(&mut output)
            .write_record("pred", &sequence)
            .unwrap();

        let text = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], ">pred");
        assert_eq!(lines[1].len(), 60);
        assert_eq!(lines[2].len(), 60);
        assert_eq!(lines[3].len(), 10);
    }

    #[test]
    fn test_write_read_roundtrip() {
        let mut output = Vec::new();
        {
            let mut writer = FastaWriter::new(&mut output);
            writer.write_record("one", &"ACGT".repeat(40)).unwrap();
            writer.write_record("two", "TTAA").unwrap();
        }

        let records = read_fasta(&output[..]).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get_sequence(), "ACGT".repeat(40));
        assert_eq!(records[1].get_sequence(), "TTAA");
    }
}
