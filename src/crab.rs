pub const CRAB: &str = r"
    _~^~^~_
\) /  o o  \ (/
  '_   u   _'
  \ '-----' /   dig crab
";
