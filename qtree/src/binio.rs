use std::io::{self, BufRead, Read, Write};

use integer_encoding::{VarIntReader, VarIntWriter};

use crate::picture::Error;

/// Reads integer records stored one per line.
///
/// Surrounding whitespace is ignored and blank lines are skipped.
pub struct RecordReader<I: BufRead> {
    input: I,

    /// 1-based number of the last line read
    line: usize,

    buffer: String,
}

impl<I: BufRead> RecordReader<I> {
    pub fn new(input: I) -> Self {
        Self {
            input,
            line: 0,
            buffer: String::new(),
        }
    }

    /// Line number of the most recently read record.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Read the leading size record of a file.
    pub fn read_header(&mut self) -> Result<usize, Error> {
        let Some(text) = self.next_line()? else {
            return Err(Error::MissingHeader);
        };

        text.parse().map_err(|_| Error::InvalidRecord {
            line: self.line,
            content: text,
        })
    }

    /// Read the next record, or `None` at the end of the input.
    pub fn read_record(&mut self) -> Result<Option<i32>, Error> {
        let Some(text) = self.next_line()? else {
            return Ok(None);
        };

        text.parse().map(Some).map_err(|_| Error::InvalidRecord {
            line: self.line,
            content: text,
        })
    }

    /// Read every remaining record.
    pub fn read_to_end(&mut self) -> Result<Vec<i32>, Error> {
        let mut records = Vec::new();
        while let Some(record) = self.read_record()? {
            records.push(record);
        }

        Ok(records)
    }

    fn next_line(&mut self) -> Result<Option<String>, io::Error> {
        loop {
            self.buffer.clear();
            if self.input.read_line(&mut self.buffer)? == 0 {
                return Ok(None);
            }
            self.line += 1;

            let text = self.buffer.trim();
            if !text.is_empty() {
                return Ok(Some(text.to_owned()));
            }
        }
    }
}

/// Writes integer records one per line.
pub struct RecordWriter<'a, O: Write> {
    output: &'a mut O,

    count: usize,
}

impl<'a, O: Write> RecordWriter<'a, O> {
    pub fn new(output: &'a mut O) -> Self {
        Self { output, count: 0 }
    }

    /// Number of records written so far, header included.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn write_header(&mut self, size: usize) -> Result<(), io::Error> {
        writeln!(self.output, "{size}")?;
        self.count += 1;

        Ok(())
    }

    pub fn write_record(&mut self, record: i32) -> Result<(), io::Error> {
        writeln!(self.output, "{record}")?;
        self.count += 1;

        Ok(())
    }

    pub fn write_records(&mut self, records: &[i32]) -> Result<(), io::Error> {
        records.iter().try_for_each(|&r| self.write_record(r))
    }

    pub fn flush(&mut self) -> Result<(), io::Error> {
        self.output.flush()
    }
}

/// Write records as zig-zag varints, returning the number of bytes written.
pub fn write_varint_records<O: Write>(output: &mut O, records: &[i32]) -> Result<usize, io::Error> {
    let mut size = 0;
    for &record in records {
        size += output.write_varint(record)?;
    }

    Ok(size)
}

/// Read up to `count` zig-zag varint records, stopping early at the end of
/// the input.
pub fn read_varint_records<I: Read>(input: &mut I, count: usize) -> Result<Vec<i32>, io::Error> {
    // The count comes from an untrusted header
    let mut records = Vec::with_capacity(count.min(1 << 16));
    for _ in 0..count {
        match input.read_varint::<i32>() {
            Ok(record) => records.push(record),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(e),
        }
    }

    Ok(records)
}
