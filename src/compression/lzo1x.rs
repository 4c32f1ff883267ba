//! LZO1X decompressor.
//!
//! LZO1X interleaves literal runs with back-references whose encoding is
//! chosen by the control byte's value range. Lengths of zero in a control
//! byte extend through a chain of 0x00 bytes, 255 per byte. The stream ends
//! with an explicit marker rather than at the declared size, so the output
//! length is checked against the caller's expectation afterwards.

use tracing::debug;

use crate::error::{Error, Result};

/// Decompresses an LZO1X stream.
///
/// The stream's end-of-stream marker decides when decoding stops; the
/// produced length is then required to match `expected_size`.
///
/// # Errors
/// Returns [`Error::UnexpectedEof`] when the stream ends before its marker,
/// [`Error::InvalidBackReference`] when a match points before the start of
/// the output, and [`Error::DecompressedSizeMismatch`] when the output
/// length differs from `expected_size`.
pub fn decompress_lzo1x(src: &[u8], expected_size: usize) -> Result<Vec<u8>> {
    debug!(expected_size, "decompressing LZO1X stream");

    let mut decoder = Decoder {
        src,
        pos: 0,
        output: Vec::with_capacity(expected_size),
    };
    decoder.run()?;

    if decoder.output.len() != expected_size {
        return Err(Error::DecompressedSizeMismatch {
            expected: expected_size,
            actual: decoder.output.len(),
        });
    }
    Ok(decoder.output)
}

/// Where the decoder picks up after the current token.
enum Step {
    /// At a literal-run control byte.
    LiteralRun,
    /// At the control byte that follows a literal run.
    FirstLiteral,
    /// At a match whose control byte has already been read.
    Match(usize),
}

struct Decoder<'a> {
    src: &'a [u8],
    pos: usize,
    output: Vec<u8>,
}

impl Decoder<'_> {
    fn run(&mut self) -> Result<()> {
        // A first byte above 17 encodes an initial literal run directly.
        let mut step = match self.src.first() {
            Some(&first) if first > 17 => {
                self.pos = 1;
                let count = usize::from(first) - 17;
                self.copy_literals(count)?;
                if count < 4 {
                    Step::Match(usize::from(self.next()?))
                } else {
                    Step::FirstLiteral
                }
            }
            _ => Step::LiteralRun,
        };

        loop {
            step = match step {
                Step::LiteralRun => self.literal_run()?,
                Step::FirstLiteral => self.first_literal()?,
                Step::Match(control) => match self.decode_match(control)? {
                    Some(next) => next,
                    None => return Ok(()),
                },
            };
        }
    }

    fn literal_run(&mut self) -> Result<Step> {
        let control = usize::from(self.next()?);
        if control >= 16 {
            return Ok(Step::Match(control));
        }
        let count = if control == 0 {
            self.extended_length(15)?
        } else {
            control
        };
        self.copy_literals(count + 3)?;
        Ok(Step::FirstLiteral)
    }

    /// Handles the control byte right after a literal run, where small
    /// values encode a 3-byte match biased past the short-distance window.
    fn first_literal(&mut self) -> Result<Step> {
        let control = usize::from(self.next()?);
        if control >= 16 {
            return Ok(Step::Match(control));
        }
        let distance = 0x801 + (control >> 2) + (usize::from(self.next()?) << 2);
        self.copy_match(distance, 3)?;
        self.after_match(control & 3)
    }

    /// Decodes one match token; `None` means the end-of-stream marker.
    fn decode_match(&mut self, control: usize) -> Result<Option<Step>> {
        let (distance, length, trailing);
        if control >= 64 {
            distance = 1 + ((control >> 2) & 7) + (usize::from(self.next()?) << 3);
            length = (control >> 5) + 1;
            trailing = control & 3;
        } else if control >= 32 {
            let base = control & 31;
            length = if base == 0 {
                self.extended_length(31)?
            } else {
                base
            } + 2;
            let d = self.take_u16_le()?;
            distance = 1 + (d >> 2);
            trailing = d & 3;
        } else if control >= 16 {
            let far = (control & 8) << 11;
            let base = control & 7;
            length = if base == 0 {
                self.extended_length(7)?
            } else {
                base
            } + 2;
            let d = self.take_u16_le()?;
            if far == 0 && d >> 2 == 0 {
                return Ok(None);
            }
            distance = 0x4000 + far + (d >> 2);
            trailing = d & 3;
        } else {
            distance = 1 + (control >> 2) + (usize::from(self.next()?) << 2);
            length = 2;
            trailing = control & 3;
        }
        self.copy_match(distance, length)?;
        self.after_match(trailing).map(Some)
    }

    /// The low two bits of every match carry up to three literals that are
    /// copied before the next control byte, which is always a match.
    fn after_match(&mut self, trailing: usize) -> Result<Step> {
        if trailing == 0 {
            return Ok(Step::LiteralRun);
        }
        self.copy_literals(trailing)?;
        Ok(Step::Match(usize::from(self.next()?)))
    }

    /// Accumulates a length continued through 0x00 bytes, 255 per byte.
    fn extended_length(&mut self, base: usize) -> Result<usize> {
        let mut total = base;
        loop {
            let byte = self.next()?;
            if byte == 0 {
                total += 255;
            } else {
                return Ok(total + usize::from(byte));
            }
        }
    }

    fn copy_literals(&mut self, count: usize) -> Result<()> {
        let end = self.pos + count;
        if end > self.src.len() {
            return Err(Error::UnexpectedEof);
        }
        self.output.extend_from_slice(&self.src[self.pos..end]);
        self.pos = end;
        Ok(())
    }

    fn copy_match(&mut self, distance: usize, length: usize) -> Result<()> {
        let start =
            self.output
                .len()
                .checked_sub(distance)
                .ok_or(Error::InvalidBackReference {
                    offset: distance,
                    position: self.output.len(),
                })?;
        // Byte-wise so matches may overlap their own output.
        for i in 0..length {
            let byte = self.output[start + i];
            self.output.push(byte);
        }
        Ok(())
    }

    fn next(&mut self) -> Result<u8> {
        let byte = *self.src.get(self.pos).ok_or(Error::UnexpectedEof)?;
        self.pos += 1;
        Ok(byte)
    }

    fn take_u16_le(&mut self) -> Result<usize> {
        let lo = self.next()?;
        let hi = self.next()?;
        Ok(usize::from(u16::from_le_bytes([lo, hi])))
    }
}
