use std::fmt::{Debug, Display, Formatter};

use super::{Code, Log};

impl<T: Display> Display for Log<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Log::None => Ok(()),
            Log::Default(s) | Log::Success(s) | Log::Result(s) | Log::Verbose(s) => {
                write!(f, "{}", s)
            }
        }
    }
}

impl<T> Log<T> {
    /// Order of the log level, used to gate trace output by threshold.
    pub fn order(&self) -> u8 {
        match self {
            Log::None => 0,
            Log::Default(_) => 1,
            Log::Success(_) => 2,
            Log::Result(_) => 3,
            Log::Verbose(_) => 4,
        }
    }
}

impl<TL: Display + Copy> Log<TL> {
    /// Print a shift/reduce/closure-step trace gated by this label's order,
    /// mirroring the `debug.order() >= Log::Verbose(()).order()` gating
    /// used for lexeme tracing. Only active in debug builds. Use this
    /// variant when the trace point has a source position to report (the
    /// lexer).
    pub fn trace<T: Debug>(&self, level: Log<()>, at: usize, code: &Code, message: T) {
        #[cfg(debug_assertions)]
        if self.order() >= level.order() {
            println!("[{}]: {:?} at {}", self, message, code.obtain_position(at));
        }
        #[cfg(not(debug_assertions))]
        {
            let _ = (level, at, code, message);
        }
    }

    /// Print a trace line with no source position attached (the table
    /// builder and the parser driver, which operate over states and
    /// tokens rather than raw source offsets).
    pub fn log<T: Debug>(&self, level: Log<()>, message: T) {
        #[cfg(debug_assertions)]
        if self.order() >= level.order() {
            println!("[{}]: {:?}", self, message);
        }
        #[cfg(not(debug_assertions))]
        {
            let _ = (level, message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_order_is_monotonic() {
        assert!(Log::None::<&str>.order() < Log::Default("x").order());
        assert!(Log::Default("x").order() < Log::Success("x").order());
        assert!(Log::Success("x").order() < Log::Result("x").order());
        assert!(Log::Result("x").order() < Log::Verbose("x").order());
    }
}
