/// Unwraps an `Err`, panicking with the `Ok` value otherwise. Extra arguments
/// are formatted into the panic message.
#[macro_export]
macro_rules! assert_err {
    ($e:expr $(, $($t:tt)* )?) => {
        match $e {
            Err(err) => err,
            Ok(actual) => {
                #[allow(unused_mut)]
                let mut msg = format!("expected `Err`; actual=Ok({:?})", actual);

                $(
                    use std::fmt::Write;
                    write!(msg, ", ").unwrap();
                    write!(msg, $($t)*).unwrap();
                )?

                panic!("{}", msg);
            }
        }
    };
}

/// Unwraps an `Ok`, panicking with the error's display text otherwise.
#[macro_export]
macro_rules! assert_ok {
    ($e:expr $(, $($t:tt)* )?) => {
        match $e {
            Ok(v) => v,
            Err(err) => {
                #[allow(unused_mut)]
                let mut msg = format!("expected `Ok`; error=`{}`", err);

                $(
                    use std::fmt::Write;
                    write!(msg, ", ").unwrap();
                    write!(msg, $($t)*).unwrap();
                )?

                panic!("{}", msg);
            }
        }
    };
}
