/// Choose between iter and par_iter
#[cfg(not(feature = "parallel"))]
macro_rules! iter {
    ($e:expr) => {
        $e.iter()
    };
}

/// Choose between iter and par_iter
#[cfg(feature = "parallel")]
macro_rules! iter {
    ($e:expr) => {
        $e.par_iter()
    };
}

/// Choose between iter_mut and par_iter_mut
#[cfg(not(feature = "parallel"))]
macro_rules! iter_mut {
    ($e:expr) => {
        $e.iter_mut()
    };
}

/// Choose between iter_mut and par_iter_mut
#[cfg(feature = "parallel")]
macro_rules! iter_mut {
    ($e:expr) => {
        $e.par_iter_mut()
    };
}

/// Choose between chunks_mut and par_chunks_mut
#[cfg(not(feature = "parallel"))]
macro_rules! chunks_mut {
    ($e:expr, $size:expr) => {
        $e.chunks_mut($size)
    };
}

/// Choose between chunks_mut and par_chunks_mut
#[cfg(feature = "parallel")]
macro_rules! chunks_mut {
    ($e:expr, $size:expr) => {
        $e.par_chunks_mut($size)
    };
}

pub(crate) use {chunks_mut, iter, iter_mut};
