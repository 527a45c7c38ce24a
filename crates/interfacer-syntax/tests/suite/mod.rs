mod parse;
mod save;
