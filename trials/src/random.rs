//! Thread-local, reproducible random number generation for Monte Carlo trials.
//!
//! Grounded on the decoder-library convention of a global seed plus a
//! per-thread jump count, so that a fixed seed reproduces the same sequence
//! of trials regardless of how many threads are used to run them.

use rand::{rngs::OsRng, RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use std::{
    cell::UnsafeCell,
    fmt,
    rc::Rc,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
    thread_local,
};

static GLOBAL_SEED: Mutex<Option<Seed>> = Mutex::new(None);
static GLOBAL_THREAD_COUNT: AtomicUsize = AtomicUsize::new(0);

thread_local! {
    static CURRENT_THREAD_ID: usize = GLOBAL_THREAD_COUNT.fetch_add(1, Ordering::AcqRel);
    static CUSTOM_THREAD_RNG_KEY: Rc<UnsafeCell<Xoshiro256PlusPlus>> = {
        let seed = get_or_insert_global_seed(None);
        let rng = get_rng_from_seed(seed, current_thread_id());
        Rc::new(UnsafeCell::new(rng))
    }
}

/// A 256-bit PRNG seed, displayed as hex for inclusion in progress messages.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Seed([u8; 32]);

impl Seed {
    pub fn from_entropy() -> Self {
        let mut buf = [0u8; 32];
        OsRng.fill_bytes(&mut buf);
        Seed(buf)
    }

    pub fn from_u64(value: u64) -> Self {
        let mut buf = [0u8; 32];
        buf[..8].copy_from_slice(&value.to_le_bytes());
        Seed(buf)
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

pub fn get_rng_from_seed(seed: Seed, jumps: usize) -> Xoshiro256PlusPlus {
    let mut rng = Xoshiro256PlusPlus::from_seed(seed.0);
    for _ in 0..jumps {
        rng.jump();
    }
    rng
}

pub fn get_or_insert_global_seed(seed: Option<Seed>) -> Seed {
    let mut global_seed = GLOBAL_SEED.lock().expect("GLOBAL_SEED should not be poisoned");
    *global_seed.get_or_insert_with(|| seed.unwrap_or_else(Seed::from_entropy))
}

pub fn global_thread_count() -> usize {
    GLOBAL_THREAD_COUNT.load(Ordering::Acquire)
}

pub fn current_thread_id() -> usize {
    CURRENT_THREAD_ID.with(|x| *x)
}

/// A thread-local PRNG seeded from the global seed with a number of jumps
/// equal to this thread's assigned index, giving every thread a disjoint
/// substream while keeping the overall run reproducible.
pub fn custom_thread_rng() -> CustomThreadRng {
    CustomThreadRng {
        rng: CUSTOM_THREAD_RNG_KEY.with(Rc::clone),
    }
}

#[derive(Clone)]
pub struct CustomThreadRng {
    rng: Rc<UnsafeCell<Xoshiro256PlusPlus>>,
}

impl RngCore for CustomThreadRng {
    #[inline(always)]
    fn next_u32(&mut self) -> u32 {
        // SAFETY: self.rng is !Sync, so no concurrent mutation is possible,
        // and no other reference to this cell is ever handed out.
        unsafe { &mut *self.rng.get() }.next_u32()
    }

    #[inline(always)]
    fn next_u64(&mut self) -> u64 {
        unsafe { &mut *self.rng.get() }.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        unsafe { &mut *self.rng.get() }.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        unsafe { &mut *self.rng.get() }.try_fill_bytes(dest)
    }
}
