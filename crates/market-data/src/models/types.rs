/// Storage provider (miner) actor address, e.g. `f01234`
pub type MinerId = String;

/// Location code reported by a registry (ISO 3166-1 alpha-2)
pub type LocationCode = String;

/// libp2p peer id used to route a storage ask to a miner
pub type PeerId = String;
