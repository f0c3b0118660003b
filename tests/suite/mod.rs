mod config_routes;
mod gateway_properties;
mod navigation;
