mod test_frame_transport;
mod test_polygon_basic;
