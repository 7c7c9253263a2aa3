#[macro_export]
macro_rules! assert_none {
    ($e:expr) => {
        match $e {
            None => {}
            actual => panic!("expected `None`; actual={:?}", actual),
        }
    };
}

#[macro_export]
macro_rules! assert_some {
    ($e:expr $(, $($t:tt)* )?) => {
        match $e {
            Some(v) => v,
            None => {
                #[allow(unused_mut)]
                let mut msg = String::from("expected `Some`; actual=None");

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
