mod position;
mod scope;

#[cfg(test)]
mod test_util;
