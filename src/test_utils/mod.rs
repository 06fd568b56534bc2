#![allow(missing_docs)]

pub(crate) mod html;
