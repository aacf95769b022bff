//! PySolFC numbered deals.
//!
//! PySolFC names a deal by its game number, and `PysolDeal` shuffles a
//! stock exactly as PySolFC would for that number. Cards start in index
//! order (clubs, spades, hearts, diamonds; ace to king within a suit), which
//! is PySolFC's own order. Game numbers written `msNNNN`, and plain numbers
//! below 32000, run on the Microsoft FreeCell generator. Every other number
//! seeds a Mersenne Twister the way CPython's `random.Random` does. The
//! shuffle itself is PySol's backwards Fisher-Yates, and the last card of the
//! shuffled list ends up on top of the stock.
//!
//! Game numbers have no upper bound, so they are held as `BigUint`.

use num_bigint::BigUint;
use num_traits::ToPrimitive;
use thiserror::Error;

use crate::card::Card;
use crate::shuffle::Shuffler;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeedError {
    #[error("empty game number")]
    Empty,
    #[error("invalid ms game number {0:?}")]
    BadMsSeed(String),
    #[error("game number contains non-digits after normalization: {0:?}")]
    NonDigits(String),
    #[error("ms game number {0} out of range 1..=8589934591")]
    MsOutOfRange(u64),
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum GameNumber {
    Ms(u64),
    Num(BigUint),
}

/// A PySolFC deal, usable as a `Shuffler`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PysolDeal {
    number: GameNumber,
}

impl PysolDeal {
    /// Parse a game number such as `"13101775566348840960"` or `"ms12345"`.
    ///
    /// Mirrors PySolFC's normalization: a trailing `L` is dropped, and
    /// whitespace and `# - _ . ,` are ignored.
    pub fn parse(s: &str) -> Result<Self, SeedError> {
        let mut t = s.trim();
        if let Some(stripped) = t.strip_suffix('L') {
            t = stripped;
        }
        let cleaned: String = t
            .chars()
            .map(|c| c.to_ascii_lowercase())
            .filter(|&c| !(c.is_whitespace() || matches!(c, '#' | '-' | '_' | '.' | ',')))
            .collect();
        if cleaned.is_empty() {
            return Err(SeedError::Empty);
        }

        if let Some(rest) = cleaned.strip_prefix("ms") {
            if rest.is_empty() || !rest.chars().all(|c| c.is_ascii_digit()) {
                return Err(SeedError::BadMsSeed(s.to_string()));
            }
            let n: u64 = rest.parse().map_err(|_| SeedError::BadMsSeed(s.to_string()))?;
            MsRng::new(n)?;
            return Ok(PysolDeal {
                number: GameNumber::Ms(n),
            });
        }

        if !cleaned.chars().all(|c| c.is_ascii_digit()) {
            return Err(SeedError::NonDigits(cleaned));
        }
        let n = BigUint::parse_bytes(cleaned.as_bytes(), 10).ok_or(SeedError::NonDigits(cleaned))?;
        if n < BigUint::from(SMALL_NUMBER_LIMIT) {
            MsRng::new(n.to_u64().unwrap_or(0))?;
        }
        Ok(PysolDeal {
            number: GameNumber::Num(n),
        })
    }

    /// Game number as PySolFC prints it.
    pub fn label(&self) -> String {
        match &self.number {
            GameNumber::Ms(n) => format!("ms{n}"),
            GameNumber::Num(n) => n.to_string(),
        }
    }
}

/// Plain game numbers below this use the Microsoft-compatible generator.
const SMALL_NUMBER_LIMIT: u32 = 32000;

impl Shuffler for PysolDeal {
    fn shuffle(&mut self, cards: &mut [Card]) {
        cards.sort_by_key(|c| c.index());
        match &self.number {
            GameNumber::Ms(n) => ms_shuffle(*n, cards),
            GameNumber::Num(n) => match n.to_u64() {
                Some(small) if small < u64::from(SMALL_NUMBER_LIMIT) => ms_shuffle(small, cards),
                _ => fisher_yates(&mut Mt19937::from_game_number(n), cards),
            },
        }
    }
}

fn ms_shuffle(game: u64, cards: &mut [Card]) {
    // Range was checked when the deal was parsed.
    if let Ok(mut rng) = MsRng::new(game) {
        fisher_yates(&mut rng, cards);
    }
}

/// A generator as PySol's shuffle consumes it.
trait DealRng {
    /// A value in `0..span`, for `span >= 2`.
    fn pick(&mut self, span: usize) -> usize;
}

/// PySol walks the list from the end, swapping each slot with a random slot
/// at or below it.
fn fisher_yates<R: DealRng, T>(rng: &mut R, items: &mut [T]) {
    for n in (1..items.len()).rev() {
        let j = rng.pick(n + 1);
        items.swap(n, j);
    }
}

/// How an ms game number shapes the generator output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MsFlavour {
    /// Games below 2^31: plain 15-bit MSVC `rand()`.
    Classic,
    /// Games in 2^31..2^32: the same stream with bit 15 forced on.
    HighBit,
    /// Games from 2^32 up: 16-bit output, offset by one.
    Extended,
}

/// The Microsoft FreeCell/Solitaire linear congruential generator, as
/// PySol extends it to 33-bit game numbers.
struct MsRng {
    state: u64,
    flavour: MsFlavour,
}

impl MsRng {
    const STATE_MASK: u64 = (1 << 33) - 1;
    const WIDE: u64 = 1 << 32;

    fn new(game: u64) -> Result<Self, SeedError> {
        if game == 0 || game > Self::STATE_MASK {
            return Err(SeedError::MsOutOfRange(game));
        }
        let flavour = match game {
            g if g < 1 << 31 => MsFlavour::Classic,
            g if g < Self::WIDE => MsFlavour::HighBit,
            _ => MsFlavour::Extended,
        };
        let state = if game < Self::WIDE { game } else { game - Self::WIDE };
        Ok(MsRng { state, flavour })
    }

    fn next(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(214_013).wrapping_add(2_531_011) & Self::STATE_MASK;
        let out = (self.state >> 16) as u32;
        match self.flavour {
            MsFlavour::Classic => out & 0x7fff,
            MsFlavour::HighBit => (out & 0x7fff) | 0x8000,
            MsFlavour::Extended => (out & 0xffff) + 1,
        }
    }
}

impl DealRng for MsRng {
    fn pick(&mut self, span: usize) -> usize {
        self.next() as usize % span
    }
}

const MT_N: usize = 624;
const MT_M: usize = 397;

/// Mersenne Twister with CPython's seeding, so `random.Random(n)` and this
/// agree for every game number.
struct Mt19937 {
    mt: [u32; MT_N],
    pos: usize,
}

/// Spreads the high bits of a seeding word into the low ones.
fn spread(x: u32) -> u32 {
    x ^ (x >> 30)
}

impl Mt19937 {
    fn from_u32(seed: u32) -> Self {
        let mut mt = [0u32; MT_N];
        mt[0] = seed;
        for i in 1..MT_N {
            mt[i] = 1_812_433_253u32.wrapping_mul(spread(mt[i - 1])).wrapping_add(i as u32);
        }
        Mt19937 { mt, pos: MT_N }
    }

    /// CPython seeds from the absolute value of the int, split into
    /// little-endian 32-bit words (a single zero word for 0).
    fn from_game_number(n: &BigUint) -> Self {
        let mut key = n.to_u32_digits();
        if key.is_empty() {
            key.push(0);
        }
        Mt19937::from_key(&key)
    }

    /// `init_by_array` from the reference implementation. `key` is non-empty.
    fn from_key(key: &[u32]) -> Self {
        let mut rng = Mt19937::from_u32(19_650_218);
        let mut i = 1;

        let rounds = MT_N.max(key.len());
        for (j, &word) in key.iter().enumerate().cycle().take(rounds) {
            let mixed = spread(rng.mt[i - 1]).wrapping_mul(1_664_525);
            rng.mt[i] = (rng.mt[i] ^ mixed).wrapping_add(word).wrapping_add(j as u32);
            i = rng.wrap_seed_index(i);
        }
        for _ in 1..MT_N {
            let mixed = spread(rng.mt[i - 1]).wrapping_mul(1_566_083_941);
            rng.mt[i] = (rng.mt[i] ^ mixed).wrapping_sub(i as u32);
            i = rng.wrap_seed_index(i);
        }

        rng.mt[0] = 0x8000_0000;
        rng.pos = MT_N;
        rng
    }

    /// Next seeding slot after `i`; slot 0 mirrors the last one on wrap.
    fn wrap_seed_index(&mut self, i: usize) -> usize {
        if i + 1 < MT_N {
            i + 1
        } else {
            self.mt[0] = self.mt[MT_N - 1];
            1
        }
    }

    fn refill(&mut self) {
        for i in 0..MT_N {
            let y = (self.mt[i] & 0x8000_0000) | (self.mt[(i + 1) % MT_N] & 0x7fff_ffff);
            let twist = if y & 1 == 1 { 0x9908_b0df } else { 0 };
            self.mt[i] = self.mt[(i + MT_M) % MT_N] ^ (y >> 1) ^ twist;
        }
        self.pos = 0;
    }

    fn next_u32(&mut self) -> u32 {
        if self.pos == MT_N {
            self.refill();
        }
        let mut y = self.mt[self.pos];
        self.pos += 1;

        y ^= y >> 11;
        y ^= (y << 7) & 0x9d2c_5680;
        y ^= (y << 15) & 0xefc6_0000;
        y ^ (y >> 18)
    }

    /// CPython `random()`: a 53-bit fraction built from two outputs.
    fn next_f64(&mut self) -> f64 {
        let hi = u64::from(self.next_u32() >> 5);
        let lo = u64::from(self.next_u32() >> 6);
        (hi * (1 << 26) + lo) as f64 / (1u64 << 53) as f64
    }
}

impl DealRng for Mt19937 {
    fn pick(&mut self, span: usize) -> usize {
        (self.next_f64() * span as f64) as usize
    }
}
