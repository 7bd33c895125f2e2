pub(crate) mod recolor;
