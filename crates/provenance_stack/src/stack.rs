//! Call-stack capture with deferred symbolization.

use crate::StackFrame;
use crate::frame::SourceCache;
use std::hint::black_box;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Default number of frames kept per captured stack.
pub const DEFAULT_MAX_DEPTH: usize = 50;

/// Extra frames tolerated before the anchor is found. The unwinder's own
/// frames come first, so an unanchored walk may need a few more than `limit`.
const UNWINDER_ALLOWANCE: usize = 32;

static MAX_DEPTH: AtomicUsize = AtomicUsize::new(DEFAULT_MAX_DEPTH);

/// Process-wide maximum depth used by [`CapturedStack::here`].
pub fn max_depth() -> usize {
    MAX_DEPTH.load(Ordering::Relaxed)
}

/// Change the process-wide maximum depth. Values below 1 are raised to 1.
pub fn set_max_depth(depth: usize) {
    let depth = depth.max(1);
    tracing::debug!(depth, "Setting maximum stack depth");
    MAX_DEPTH.store(depth, Ordering::Relaxed);
}

/// Raw program counters captured at a point of failure.
///
/// Capture is synchronous and cheap: only addresses are recorded. Turning
/// them into [`StackFrame`]s happens on the first call to
/// [`frames`](Self::frames) and the result is cached for the lifetime of
/// the stack. Concurrent first readers block on the same initialisation,
/// so symbolization runs once.
///
/// # Examples
///
/// ```
/// use provenance_stack::CapturedStack;
///
/// let stack = CapturedStack::capture(0, 8);
/// assert!(stack.len() <= 8);
/// print!("{}", stack.render());
/// ```
#[derive(Debug)]
pub struct CapturedStack {
    addresses: Vec<usize>,
    frames: OnceLock<Vec<StackFrame>>,
}

impl CapturedStack {
    /// Capture the current call stack.
    ///
    /// With `skip == 0` the first recorded frame is the function that called
    /// `capture`; each increment drops one more caller. At most `max_depth`
    /// frames are kept.
    ///
    /// Frames belonging to the unwinder itself are discarded by anchoring on
    /// this function's own symbol address. If the anchor is never seen (for
    /// instance when symbol addresses are unavailable on the platform) the
    /// raw trace is used as is, still bounded by `skip + max_depth` plus a
    /// small allowance for unwinder frames.
    ///
    /// `skip` counts real frames. Any function that sits between the user and
    /// `capture` and passes a `skip` on must be `#[inline(never)]` and must
    /// not tail-call the next capturing function, or optimized builds fold its
    /// frame away. Returning the result through [`black_box`] keeps the call
    /// out of tail position, as [`here`](Self::here) does.
    #[inline(never)]
    pub fn capture(skip: usize, max_depth: usize) -> Self {
        let anchor = (Self::capture as fn(usize, usize) -> Self) as usize;
        let mut walk = Walk::new(anchor, skip.saturating_add(max_depth));

        backtrace::trace(|frame| walk.visit(frame.symbol_address() as usize, frame.ip() as usize));

        let mut addresses = walk.addresses;
        let skip = skip.min(addresses.len());
        addresses.drain(..skip);
        addresses.truncate(max_depth);
        addresses.shrink_to_fit();

        Self {
            addresses,
            frames: OnceLock::new(),
        }
    }

    /// Capture using the process-wide [`max_depth`].
    ///
    /// `skip` has the same meaning as for [`capture`](Self::capture),
    /// relative to the caller of `here`.
    #[inline(never)]
    pub fn here(skip: usize) -> Self {
        black_box(Self::capture(skip + 1, max_depth()))
    }

    /// A stack with no frames.
    pub fn empty() -> Self {
        Self {
            addresses: Vec::new(),
            frames: OnceLock::new(),
        }
    }

    /// The raw program counters, innermost first.
    pub fn addresses(&self) -> &[usize] {
        &self.addresses
    }

    /// Number of captured frames.
    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    /// Whether no frames were captured.
    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    /// Whether [`frames`](Self::frames) has already been computed.
    pub fn is_resolved(&self) -> bool {
        self.frames.get().is_some()
    }

    /// Resolved frames, innermost first. Symbolizes on first access.
    pub fn frames(&self) -> &[StackFrame] {
        self.frames.get_or_init(|| {
            tracing::trace!(depth = self.addresses.len(), "Resolving captured stack");
            let mut sources = SourceCache::default();
            self.addresses
                .iter()
                .map(|&address| StackFrame::resolve(address, &mut sources))
                .collect()
        })
    }

    /// Multi-line dump of every frame in conventional stack-dump format.
    pub fn render(&self) -> String {
        self.frames().iter().map(ToString::to_string).collect()
    }
}

/// Frame-by-frame state of one stack walk.
struct Walk {
    anchor: usize,
    limit: usize,
    anchored: bool,
    addresses: Vec<usize>,
}

impl Walk {
    fn new(anchor: usize, limit: usize) -> Self {
        Self {
            anchor,
            limit,
            anchored: false,
            addresses: Vec::with_capacity(limit.min(DEFAULT_MAX_DEPTH * 2)),
        }
    }

    /// Record one frame. Returns whether the walk should continue.
    fn visit(&mut self, symbol_address: usize, ip: usize) -> bool {
        if !self.anchored && symbol_address == self.anchor {
            self.addresses.clear();
            self.anchored = true;
            return true;
        }
        self.addresses.push(ip);

        let bound = if self.anchored {
            self.limit
        } else {
            self.limit.saturating_add(UNWINDER_ALLOWANCE)
        };
        self.addresses.len() < bound
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_depth_captures_nothing() {
        let stack = CapturedStack::capture(0, 0);
        assert!(stack.is_empty());
        assert_eq!(stack.render(), "");
    }

    #[test]
    fn skipping_past_the_stack_captures_nothing() {
        let stack = CapturedStack::capture(100_000, 10);
        assert!(stack.is_empty());
    }

    #[test]
    fn depth_is_bounded() {
        let stack = CapturedStack::capture(0, 2);
        assert!(stack.len() <= 2);
        assert!(!stack.is_empty());
    }

    #[test]
    fn frames_are_resolved_once() {
        let stack = CapturedStack::capture(0, 4);
        assert!(!stack.is_resolved());
        let first = stack.frames().as_ptr();
        assert!(stack.is_resolved());
        let second = stack.frames().as_ptr();
        assert_eq!(first, second);
        assert_eq!(stack.frames().len(), stack.len());
    }

    #[test]
    fn render_has_one_header_per_frame() {
        let stack = CapturedStack::capture(0, 3);
        let rendered = stack.render();
        let headers = rendered.lines().filter(|line| !line.starts_with('\t')).count();
        assert_eq!(headers, stack.len());
    }

    #[test]
    fn walk_drops_frames_before_anchor() {
        let mut walk = Walk::new(0x100, 3);
        assert!(walk.visit(0x900, 1));
        assert!(walk.visit(0x910, 2));
        assert!(walk.visit(0x100, 3));
        assert!(walk.visit(0x200, 4));
        assert!(walk.visit(0x300, 5));
        assert!(!walk.visit(0x400, 6));
        assert_eq!(walk.addresses, vec![4, 5, 6]);
    }

    #[test]
    fn unanchored_walk_is_bounded() {
        let mut walk = Walk::new(0x100, 4);
        let visited = (0..10_000usize)
            .take_while(|&ip| walk.visit(0x200, ip))
            .count();
        assert_eq!(visited + 1, 4 + UNWINDER_ALLOWANCE);
        assert_eq!(walk.addresses.len(), 4 + UNWINDER_ALLOWANCE);
    }

    #[test]
    fn anchor_only_counts_once() {
        let mut walk = Walk::new(0x100, 8);
        walk.visit(0x100, 1);
        walk.visit(0x100, 2);
        assert_eq!(walk.addresses, vec![2]);
    }

    #[test]
    fn empty_stack() {
        let stack = CapturedStack::empty();
        assert!(stack.is_empty());
        assert!(stack.frames().is_empty());
    }
}
