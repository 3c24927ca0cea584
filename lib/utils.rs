//! Small conveniences for writing output.
//!
//! Both macros use `?` and so must be invoked from a function returning a
//! `Result` whose error type converts from [`std::io::Error`] (and, for
//! [`write_npz!`], [`ndarray_npy::WriteNpzError`]).

/// Create a directory and all its parents if it does not already exist.
#[macro_export]
macro_rules! mkdir {
    ( $dir:expr ) => {
        {
            let dir_ = &$dir;
            if !dir_.is_dir() {
                ::std::fs::create_dir_all(dir_)?;
            }
        }
    };
}

/// Write a collection of named arrays to a `.npz` file.
///
/// ```ignore
/// write_npz!(
///     outdir.join("data.npz"),
///     arrays: {
///         "x" => grid.positions(),
///         "psi_re" => psi.re(),
///     }
/// );
/// ```
#[macro_export]
macro_rules! write_npz {
    (
        $filename:expr,
        arrays: { $( $name:expr => $arr:expr ),+ $(,)? }
    ) => {
        {
            let mut npz_
                = ::ndarray_npy::NpzWriter::new(
                    ::std::fs::File::create($filename)?
                );
            $( npz_.add_array($name, $arr)?; )+
            npz_.finish()?;
        }
    };
}
