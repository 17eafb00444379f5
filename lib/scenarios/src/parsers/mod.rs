mod relief;
pub use relief::ReliefFmt;

mod nom_prelude {
  pub use nom::{
    IResult,
    error::{
      self,
      ParseError,
      FromExternalError,
    },
    sequence::*,
    combinator::*,
    character::complete::*,
    number::complete::double,
    Finish,
  };
  pub use std::str::FromStr;
  pub use std::num::ParseIntError;
}

mod common;

pub trait ParseScenario<Fmt>: Sized {
  fn parse(input: Fmt) -> crate::Result<Self>;
}
