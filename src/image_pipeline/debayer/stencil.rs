//! Neighbour stencils and their border-reduced variants.
//!
//! Every interpolated value is the mean of the same-coloured neighbours a
//! stencil names. At the outermost ring of pixels some neighbours fall
//! outside the image; they are dropped and the divisor shrinks to the number
//! of neighbours actually present. The valid neighbour lists are computed
//! once per pixel class (interior, four edges, four corners).

/// Neighbour shape used to estimate a colour that is not sampled natively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stencil {
    /// Left and right.
    Horizontal,
    /// Up and down.
    Vertical,
    /// The four orthogonal neighbours.
    Plus,
    /// The four diagonal neighbours.
    Cross,
}

impl Stencil {
    pub const ALL: [Stencil; 4] = [
        Stencil::Horizontal,
        Stencil::Vertical,
        Stencil::Plus,
        Stencil::Cross,
    ];

    /// Offsets `(dx, dy)` of the full, unclipped stencil.
    pub fn nominal(self) -> &'static [(isize, isize)] {
        match self {
            Self::Horizontal => &[(-1, 0), (1, 0)],
            Self::Vertical => &[(0, -1), (0, 1)],
            Self::Plus => &[(-1, 0), (1, 0), (0, -1), (0, 1)],
            Self::Cross => &[(-1, -1), (1, -1), (-1, 1), (1, 1)],
        }
    }

    #[inline(always)]
    fn index(self) -> usize {
        self as usize
    }
}

/// Position of a coordinate along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Start,
    Inner,
    End,
}

impl Edge {
    #[inline(always)]
    pub fn of(pos: usize, len: usize) -> Self {
        if pos == 0 {
            Self::Start
        } else if pos + 1 == len {
            Self::End
        } else {
            Self::Inner
        }
    }

    #[inline(always)]
    fn admits(self, delta: isize) -> bool {
        match self {
            Self::Start => delta >= 0,
            Self::End => delta <= 0,
            Self::Inner => true,
        }
    }
}

/// Interior, one of four edges, or one of four corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelClass {
    pub row: Edge,
    pub col: Edge,
}

impl PixelClass {
    pub const ALL: [PixelClass; 9] = {
        use Edge::*;
        [
            PixelClass { row: Start, col: Start },
            PixelClass { row: Start, col: Inner },
            PixelClass { row: Start, col: End },
            PixelClass { row: Inner, col: Start },
            PixelClass { row: Inner, col: Inner },
            PixelClass { row: Inner, col: End },
            PixelClass { row: End, col: Start },
            PixelClass { row: End, col: Inner },
            PixelClass { row: End, col: End },
        ]
    };

    /// Requires `width >= 2` and `height >= 2`.
    #[inline(always)]
    pub fn of(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            row: Edge::of(y, height),
            col: Edge::of(x, width),
        }
    }

    pub fn is_corner(self) -> bool {
        self.row != Edge::Inner && self.col != Edge::Inner
    }

    pub fn is_interior(self) -> bool {
        self.row == Edge::Inner && self.col == Edge::Inner
    }

    #[inline(always)]
    fn index(self) -> usize {
        let axis = |e: Edge| match e {
            Edge::Start => 0,
            Edge::Inner => 1,
            Edge::End => 2,
        };
        axis(self.row) * 3 + axis(self.col)
    }
}

/// The in-bounds subset of one stencil for one pixel class.
#[derive(Debug, Clone, Copy, Default)]
pub struct Taps {
    offsets: [(isize, isize); 4],
    len: usize,
}

impl Taps {
    fn clip(stencil: Stencil, class: PixelClass) -> Self {
        let mut taps = Self::default();
        for &(dx, dy) in stencil.nominal() {
            if class.col.admits(dx) && class.row.admits(dy) {
                taps.offsets[taps.len] = (dx, dy);
                taps.len += 1;
            }
        }
        taps
    }

    #[inline(always)]
    pub fn offsets(&self) -> &[(isize, isize)] {
        &self.offsets[..self.len]
    }

    /// Divisor of the mean: the number of neighbours in bounds.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Clipped taps for every stencil and pixel class.
#[derive(Debug, Clone)]
pub struct StencilTable {
    taps: [[Taps; 4]; 9],
}

impl StencilTable {
    pub fn new() -> Self {
        let mut taps = [[Taps::default(); 4]; 9];
        for class in PixelClass::ALL {
            for stencil in Stencil::ALL {
                taps[class.index()][stencil.index()] = Taps::clip(stencil, class);
            }
        }
        Self { taps }
    }

    #[inline(always)]
    pub fn get(&self, class: PixelClass, stencil: Stencil) -> &Taps {
        &self.taps[class.index()][stencil.index()]
    }
}

impl Default for StencilTable {
    fn default() -> Self {
        Self::new()
    }
}
