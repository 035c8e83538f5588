mod isolation;
mod lifecycle;
