mod catalog;
mod classpath;
mod driver;
mod workspace;
