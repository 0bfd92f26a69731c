pub mod resolv_conf;
